//! Membership lookup interface used by the role check service.
use async_trait::async_trait;
use thiserror::Error;

use crate::services::discord::types::{GuildId, RoleId, UserId};

/// Result type for membership lookups.
pub type LookupResult<T> = Result<T, LookupError>;

/// Upstream lookup failures.
///
/// Note:
/// - Kept independent from `AppError`; the handler decides how each case is
///   rendered (forwarded status, 502, debug detail in development).
/// - A non-success status is never folded into "role not present".
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// Upstream answered with a non-success status. Status and body are kept verbatim.
    #[error("Discord API error: {status}")]
    Rejected { status: u16, body: String },
    /// The request never produced a response (DNS, TLS, connection reset, ...).
    #[error("Discord API request failed: {message}")]
    Transport { message: String, detail: String },
    /// Success status, but the body was not a member payload.
    #[error("Discord API returned an unexpected payload: {0}")]
    InvalidPayload(String),
    /// The id cannot address a single member (e.g. `..`). Nothing was sent.
    #[error("User ID cannot be used for a member lookup: {0:?}")]
    InvalidUserId(String),
}

/// A single-shot guild member lookup. No retries, no caching.
///
/// Implementations are shared behind `Arc<dyn MembershipClient>` in `AppState`.
#[async_trait]
pub trait MembershipClient: std::fmt::Debug + Send + Sync + 'static {
    // Backend name (for logging).
    fn backend_name(&self) -> &'static str;

    // Fetch the role ids the user holds in the guild.
    async fn fetch_member_roles(
        &self,
        guild_id: &GuildId,
        user_id: &UserId,
    ) -> LookupResult<Vec<RoleId>>;
}
