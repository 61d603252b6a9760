/*
 * Responsibility
 * - GET / (利用可能な endpoint 一覧)
 * - upstream には触れない
 */
use axum::Json;
use chrono::Utc;
use serde_json::{Value, json};

use crate::api::dto::timestamp;

/// Route listing for whoever is wiring up an integration by hand.
pub async fn index() -> Json<Value> {
    Json(json!({
        "message": "Discord Role Check API",
        "endpoints": [
            "GET /health - Health check",
            "ANY /api/check-role - Role check (query or body)",
            "GET|POST /api/botghost-check-role - Role check, bot builder alias",
            "POST /webhook - Role check, webhook payloads",
        ],
        "timestamp": timestamp(Utc::now()),
    }))
}
