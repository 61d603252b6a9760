/*
 * Responsibility
 * - role check handler (method 不問)
 * - InboundRequest → user id 抽出 → RoleCheckService → response DTO
 * - 失敗はすべて AppError として JSON に変換 (process は落とさない)
 */
use axum::{Json, extract::State};
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::{
    api::dto::role_check::{ReceivedData, RoleCheckResponse},
    api::extractors::{InboundRequest, extract_user_id},
    error::AppError,
    state::AppState,
};

pub async fn check_role(
    State(state): State<AppState>,
    inbound: InboundRequest,
) -> Result<Json<RoleCheckResponse>, AppError> {
    debug!(
        method = %inbound.method,
        content_type = ?inbound.content_type,
        query = ?inbound.query,
        body = %inbound.body,
        "role check request received"
    );

    let Some(found) = extract_user_id(&inbound) else {
        info!(method = %inbound.method, "no user id found in request");
        return Err(AppError::missing_user_id(ReceivedData::from(&inbound)));
    };

    info!(user_id = %found.user_id, source = found.source.as_str(), "user id extracted");

    let svc = &state.role_check;
    let has_role = svc
        .check(&found.user_id)
        .await
        .map_err(|e| {
            warn!(user_id = %found.user_id, error = %e, "role check failed");
            AppError::from_lookup(e, state.app_env)
        })?;

    Ok(Json(RoleCheckResponse::new(
        has_role,
        found.user_id,
        svc.guild_id().clone(),
        svc.target_role_id().clone(),
        &inbound.method,
        Utc::now(),
    )))
}
