/*
 * Responsibility
 * - user id の探索順序 (chain) と、各 source の結果型 (Probe)
 * - 失敗しない: 壊れた入力は「その source では見つからなかった」扱い
 * 置くもの
 *  - Probe / IdSource / ExtractedUserId
 *  - chain の実行
 * 置かないもの
 *  - 個々の field 名 (sources.rs)
 */
use serde_json::Value;
use tracing::debug;

use super::sources::CHAIN;
use crate::api::extractors::inbound::InboundRequest;
use crate::services::discord::UserId;

/// Where an identifier was found, in chain order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdSource {
    Query,
    Body,
    User,
    Member,
    Author,
    Data,
}

impl IdSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdSource::Query => "query",
            IdSource::Body => "body",
            IdSource::User => "body.user",
            IdSource::Member => "body.member",
            IdSource::Author => "body.author",
            IdSource::Data => "body.data",
        }
    }
}

/// Outcome of probing one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    Found(UserId),
    /// The source is absent or holds no usable value.
    Empty,
    /// The source exists but could not be decoded. Treated like `Empty` by the chain.
    Malformed(String),
}

impl From<Option<UserId>> for Probe {
    fn from(value: Option<UserId>) -> Self {
        value.map_or(Probe::Empty, Probe::Found)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedUserId {
    pub user_id: UserId,
    pub source: IdSource,
}

/// Runs the sources in order; the first `Found` wins.
pub fn extract_user_id(req: &InboundRequest) -> Option<ExtractedUserId> {
    for (source, probe) in CHAIN {
        match probe(req) {
            Probe::Found(user_id) => return Some(ExtractedUserId { user_id, source }),
            Probe::Empty => {}
            Probe::Malformed(reason) => {
                debug!(source = source.as_str(), %reason, "skipping malformed user id source");
            }
        }
    }
    None
}

/// Non-empty strings and integers are identifiers. Everything else is not.
///
/// `.` and `..` are dot segments; as a path segment they would address the
/// member list instead of one member.
pub(super) fn identifier(value: &Value) -> Option<UserId> {
    match value {
        Value::String(s) if !s.is_empty() && !UserId::is_dot_segment(s) => {
            Some(UserId::new(s.as_str()))
        }
        Value::Number(n) if n.is_u64() || n.is_i64() => Some(UserId::new(n.to_string())),
        _ => None,
    }
}

/// First key of `keys` holding an identifier, if `value` is an object.
pub(super) fn first_field(value: &Value, keys: &[&str]) -> Option<UserId> {
    let obj = value.as_object()?;
    keys.iter().find_map(|key| obj.get(*key).and_then(identifier))
}
