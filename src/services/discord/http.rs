/*
 * Responsibility
 * - reqwest による guild member lookup (GET 一回, retry なし)
 * - bot 認証 header と User-Agent の付与
 * - id は encoded path segment として連結 (dot segment は送らない)
 */
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::BotToken;
use crate::services::discord::client::{LookupError, LookupResult, MembershipClient};
use crate::services::discord::types::{GuildId, MembershipRecord, RoleId, UserId};

#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("bot token is not a valid header value")]
    InvalidToken,
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// reqwest-backed Discord REST client.
///
/// One GET per lookup. Timeouts, pooling and TLS are reqwest defaults.
#[derive(Clone, Debug)]
pub struct DiscordClient {
    http: reqwest::Client,
    api_base: Url,
}

impl DiscordClient {
    pub fn new(api_base: Url, token: &BotToken) -> Result<Self, ClientBuildError> {
        let mut auth = HeaderValue::from_str(&format!("Bot {}", token.expose()))
            .map_err(|_| ClientBuildError::InvalidToken)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        // Discord rejects requests without a `DiscordBot (url, version)` user agent.
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!(
                "DiscordBot (",
                env!("CARGO_PKG_REPOSITORY"),
                ", ",
                env!("CARGO_PKG_VERSION"),
                ")"
            )),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { http, api_base })
    }

    /// `{api_base}/guilds/{guild_id}/members/{user_id}`, ids pushed as encoded segments.
    fn member_url(&self, guild_id: &GuildId, user_id: &UserId) -> LookupResult<Url> {
        if UserId::is_dot_segment(user_id.as_str()) {
            return Err(LookupError::InvalidUserId(user_id.to_string()));
        }

        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| LookupError::Transport {
                message: "Discord API base URL cannot carry a path".to_string(),
                detail: self.api_base.to_string(),
            })?
            .pop_if_empty()
            .extend(["guilds", guild_id.as_str(), "members", user_id.as_str()]);
        Ok(url)
    }
}

fn transport_error(err: reqwest::Error) -> LookupError {
    let detail = format!("{err:?}");
    LookupError::Transport {
        // Without the URL, which carries the caller's id.
        message: err.without_url().to_string(),
        detail,
    }
}

#[async_trait]
impl MembershipClient for DiscordClient {
    fn backend_name(&self) -> &'static str {
        "discord"
    }

    #[instrument(level = "debug", skip_all, fields(guild_id = %guild_id, user_id = %user_id))]
    async fn fetch_member_roles(
        &self,
        guild_id: &GuildId,
        user_id: &UserId,
    ) -> LookupResult<Vec<RoleId>> {
        let url = self.member_url(guild_id, user_id)?;

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        debug!(status = status.as_u16(), "Discord API responded");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|err| {
                warn!(error = %err, "failed to read Discord API error body");
                String::new()
            });
            warn!(status = status.as_u16(), body = %body, "Discord API rejected member lookup");
            return Err(LookupError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(transport_error)?;
        let record: MembershipRecord = serde_json::from_slice(&bytes)
            .map_err(|err| LookupError::InvalidPayload(err.to_string()))?;

        debug!(roles = ?record.roles, "member roles fetched");
        Ok(record.roles)
    }
}
