/*
 * Responsibility
 * - 各 source の field 名と探索ロジック
 * - 変更理由: caller 側 (webhook / bot builder) が新しい形式で送ってきた
 */
use serde_json::Value;

use super::core::{IdSource, Probe, first_field, identifier};
use crate::api::extractors::inbound::InboundRequest;

type Extractor = fn(&InboundRequest) -> Probe;

pub(super) const CHAIN: [(IdSource, Extractor); 6] = [
    (IdSource::Query, from_query),
    (IdSource::Body, from_body),
    (IdSource::User, from_user),
    (IdSource::Member, from_member),
    (IdSource::Author, from_author),
    (IdSource::Data, from_data),
];

const QUERY_KEYS: &[&str] = &["userId", "user_id", "discord_id", "member_id", "id"];
const BODY_KEYS: &[&str] = &[
    "userId",
    "user_id",
    "discord_id",
    "member_id",
    "id",
    "discordUserId",
];
const USER_KEYS: &[&str] = &["id", "userId", "discord_id"];
const MEMBER_KEYS: &[&str] = &["id", "userId"];
const DATA_KEYS: &[&str] = &["userId", "user_id", "discord_id", "id"];

fn from_query(req: &InboundRequest) -> Probe {
    QUERY_KEYS
        .iter()
        .find_map(|key| req.query_field(key).and_then(identifier))
        .into()
}

fn from_body(req: &InboundRequest) -> Probe {
    first_field(&req.body, BODY_KEYS).into()
}

fn from_user(req: &InboundRequest) -> Probe {
    req.body_field("user")
        .and_then(|user| first_field(user, USER_KEYS))
        .into()
}

fn from_member(req: &InboundRequest) -> Probe {
    let Some(member) = req.body_field("member") else {
        return Probe::Empty;
    };

    first_field(member, MEMBER_KEYS)
        .or_else(|| {
            member
                .get("user")
                .and_then(|user| first_field(user, &["id"]))
        })
        .into()
}

fn from_author(req: &InboundRequest) -> Probe {
    req.body_field("author")
        .and_then(|author| first_field(author, &["id"]))
        .into()
}

/// `data` may be an object or a JSON document encoded as a string.
fn from_data(req: &InboundRequest) -> Probe {
    match req.body_field("data") {
        None => Probe::Empty,
        Some(Value::String(raw)) if raw.is_empty() => Probe::Empty,
        Some(Value::String(raw)) => match serde_json::from_str::<Value>(raw) {
            Ok(parsed) => first_field(&parsed, DATA_KEYS).into(),
            Err(err) => Probe::Malformed(err.to_string()),
        },
        Some(other) => first_field(other, DATA_KEYS).into(),
    }
}
