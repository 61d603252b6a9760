/*
 * Responsibility
 * - GET /health (疎通用)
 * - upstream には触れない
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use serde_json::json;

use crate::api::dto::timestamp;

pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({"status": "OK", "timestamp": timestamp(Utc::now())})),
    )
}
