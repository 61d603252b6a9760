/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - LookupError を HTTP の意味へ変換 (upstream status はそのまま転送)
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::api::dto::role_check::ReceivedData;
use crate::config::AppEnv;
use crate::services::discord::LookupError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    // Callers branch on these two even for failures.
    pub success: bool,
    pub has_role: bool,
    pub error: ErrorBody,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_data: Option<ReceivedData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("User ID is required")]
    MissingUserId { received: Box<ReceivedData> },
    #[error("User ID cannot be used for a member lookup: {0:?}")]
    InvalidUserId(String),
    #[error("Discord API error: {status}")]
    UpstreamRejected { status: u16, body: String },
    #[error("{message}")]
    UpstreamUnavailable {
        message: String,
        debug: Option<String>,
    },
    #[error("{0}")]
    InvalidUpstreamPayload(String),
}

impl AppError {
    pub fn missing_user_id(received: ReceivedData) -> Self {
        Self::MissingUserId {
            received: Box::new(received),
        }
    }

    /// Maps a lookup failure. Transport internals are only attached outside production.
    pub fn from_lookup(e: LookupError, app_env: AppEnv) -> Self {
        match e {
            LookupError::Rejected { status, body } => Self::UpstreamRejected { status, body },
            LookupError::Transport { message, detail } => Self::UpstreamUnavailable {
                message: format!("Discord API request failed: {message}"),
                debug: (!app_env.is_production()).then_some(detail),
            },
            LookupError::InvalidPayload(reason) => Self::InvalidUpstreamPayload(format!(
                "Discord API returned an unexpected payload: {reason}"
            )),
            LookupError::InvalidUserId(id) => Self::InvalidUserId(id),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingUserId { .. } | AppError::InvalidUserId(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::UpstreamRejected { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            AppError::UpstreamUnavailable { .. } | AppError::InvalidUpstreamPayload(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingUserId { .. } => "MISSING_USER_ID",
            AppError::InvalidUserId(_) => "INVALID_USER_ID",
            AppError::UpstreamRejected { .. } => "UPSTREAM_REJECTED",
            AppError::UpstreamUnavailable { .. } => "UPSTREAM_UNAVAILABLE",
            AppError::InvalidUpstreamPayload(_) => "INVALID_UPSTREAM_PAYLOAD",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let error_message = self.to_string();

        let mut body = ErrorResponse {
            success: false,
            has_role: false,
            error: ErrorBody {
                code,
                message: error_message.clone(),
            },
            message: error_message,
            upstream_status: None,
            details: None,
            received_data: None,
            debug: None,
        };

        match self {
            AppError::MissingUserId { received } => {
                body.message =
                    "Please provide userId in query params or request body".to_string();
                body.received_data = Some(*received);
            }
            AppError::UpstreamRejected { status, body: raw } => {
                body.upstream_status = Some(status);
                body.details = Some(raw);
            }
            AppError::UpstreamUnavailable { debug, .. } => {
                body.debug = debug;
            }
            AppError::InvalidUserId(_) | AppError::InvalidUpstreamPayload(_) => {}
        }

        (status, Json(body)).into_response()
    }
}
