/*
 * Responsibility
 * - method を問わず request を「ゆるく」受ける extractor
 * - query / body (JSON or form) を serde_json::Value として保持する
 * - form / query の bracket key (user[id]=1) は nested object に展開する
 * - body が壊れていても reject しない (空 object 扱い)
 */
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{Method, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};
use tracing::debug;

/// An inbound role-check request whose shape is controlled by the caller.
///
/// Nothing here is validated. Fields are probed later by the user id chain.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub content_type: Option<String>,
    /// Query parameters. Bracket keys nest; a repeated flat key keeps its first value.
    pub query: Map<String, Value>,
    /// Parsed body. An empty object when there is no usable body.
    pub body: Value,
}

impl InboundRequest {
    pub fn new(method: Method, content_type: Option<&str>, query: Option<&str>, body: &[u8]) -> Self {
        Self {
            method,
            content_type: content_type.map(str::to_owned),
            query: query.map(|q| parse_form(q.as_bytes())).unwrap_or_default(),
            body: parse_body(content_type, body),
        }
    }

    pub fn query_field(&self, key: &str) -> Option<&Value> {
        self.query.get(key)
    }

    pub fn body_field(&self, key: &str) -> Option<&Value> {
        self.body.as_object().and_then(|obj| obj.get(key))
    }
}

impl<S> FromRequest<S> for InboundRequest
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let method = req.method().clone();
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let query = req.uri().query().map(str::to_owned);

        // Only fails on transport problems (e.g. body limit exceeded).
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;

        Ok(Self::new(
            method,
            content_type.as_deref(),
            query.as_deref(),
            &bytes,
        ))
    }
}

fn is_form(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| {
            ct.trim_start()
                .to_ascii_lowercase()
                .starts_with("application/x-www-form-urlencoded")
        })
        .unwrap_or(false)
}

/// Depth of `member[user][id]`, with room to spare.
const FORM_MAX_DEPTH: usize = 5;

/// `a=1&user[id]=2` → `{"a": "1", "user": {"id": "2"}}`.
///
/// Non-strict mode also accepts percent-encoded brackets (`user%5Bid%5D=2`).
/// Input the nested parser refuses (repeated flat keys, conflicting shapes)
/// is read flat instead.
fn parse_form(raw: &[u8]) -> Map<String, Value> {
    let nested = serde_qs::Config::new(FORM_MAX_DEPTH, false).deserialize_bytes(raw);
    match nested {
        Ok(map) => map,
        Err(err) => {
            debug!(error = %err, "form is not nestable; reading keys flat");
            parse_flat_form(raw)
        }
    }
}

/// `a=1&b=2` → `{"a": "1", "b": "2"}`. Repeated keys keep the first value.
fn parse_flat_form(raw: &[u8]) -> Map<String, Value> {
    let mut map = Map::new();
    for (key, value) in url::form_urlencoded::parse(raw) {
        map.entry(key.into_owned())
            .or_insert_with(|| Value::String(value.into_owned()));
    }
    map
}

fn parse_body(content_type: Option<&str>, raw: &[u8]) -> Value {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Value::Object(Map::new());
    }

    if is_form(content_type) {
        return Value::Object(parse_form(raw));
    }

    match serde_json::from_slice::<Value>(raw) {
        Ok(value) => value,
        Err(err) => {
            debug!(error = %err, ?content_type, "request body is not JSON; treating as empty");
            Value::Object(Map::new())
        }
    }
}
