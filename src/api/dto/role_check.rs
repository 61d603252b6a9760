/*
 * Responsibility
 * - role check の response DTO
 * - caller ごとに期待する field 名が違うため、同じ真偽値を複数の key で返す
 */
use axum::http::Method;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::api::dto::timestamp;
use crate::api::extractors::InboundRequest;
use crate::services::discord::{GuildId, RoleId, UserId};

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoleCheckResponse {
    pub success: bool,
    pub has_role: bool,

    // Aliases of `has_role`.
    pub role_found: bool,
    pub authorized: bool,
    pub result: &'static str,
    pub status: &'static str,
    pub access: &'static str,

    pub user_id: UserId,
    pub guild_id: GuildId,
    pub role_id: RoleId,
    pub timestamp: String,
    pub method: String,
}

impl RoleCheckResponse {
    pub fn new(
        has_role: bool,
        user_id: UserId,
        guild_id: GuildId,
        role_id: RoleId,
        method: &Method,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            success: true,
            has_role,
            role_found: has_role,
            authorized: has_role,
            result: if has_role { "true" } else { "false" },
            status: if has_role { "success" } else { "failed" },
            access: if has_role { "granted" } else { "denied" },
            user_id,
            guild_id,
            role_id,
            timestamp: timestamp(now),
            method: method.to_string(),
        }
    }
}

/// Echo of what the caller sent, returned when no user id could be found.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedData {
    pub method: String,
    pub body: Value,
    pub query: Map<String, Value>,
    pub content_type: Option<String>,
}

impl From<&InboundRequest> for ReceivedData {
    fn from(req: &InboundRequest) -> Self {
        Self {
            method: req.method.to_string(),
            body: req.body.clone(),
            query: req.query.clone(),
            content_type: req.content_type.clone(),
        }
    }
}
