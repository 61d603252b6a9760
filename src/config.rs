/*
 * Responsibility
 * - 環境変数や設定の読み込み (bot token, guild / role, CORS, limits)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - 起動時に一度だけ組み立て、以降は read-only
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::services::discord::{GuildId, RoleId};

pub const DEFAULT_DISCORD_API_BASE: &str = "https://discord.com/api/v10";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn parse(value: Option<&str>) -> Self {
        match value
            .unwrap_or("development")
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Bot credential for the upstream API. Never printed.
#[derive(Clone)]
pub struct BotToken(String);

impl BotToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BotToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BotToken(***)")
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub request_body_limit_bytes: usize,
    pub request_timeout: Duration,

    pub discord_api_base: Url,
    pub bot_token: BotToken,
    pub guild_id: GuildId,
    pub target_role_id: RoleId,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup (the process env in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset.
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port: u16 = match get("PORT") {
            Some(s) => s.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(get("APP_ENV").as_deref());

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let request_body_limit_bytes = match get("REQUEST_BODY_LIMIT_BYTES") {
            Some(v) => v
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::Invalid("REQUEST_BODY_LIMIT_BYTES"))?,
            None => 1024 * 1024,
        };

        let request_timeout_seconds = match get("REQUEST_TIMEOUT_SECONDS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"))?,
            None => 30,
        };

        let discord_api_base = get("DISCORD_API_BASE")
            .unwrap_or_else(|| DEFAULT_DISCORD_API_BASE.to_string());
        let discord_api_base =
            Url::parse(discord_api_base.trim()).map_err(|_| ConfigError::Invalid("DISCORD_API_BASE"))?;
        if discord_api_base.cannot_be_a_base() {
            return Err(ConfigError::Invalid("DISCORD_API_BASE"));
        }

        // `TOKEN` is the legacy name still used by older deployments.
        let bot_token = get("DISCORD_BOT_TOKEN")
            .or_else(|| get("TOKEN"))
            .map(|t| BotToken::new(t.trim()))
            .ok_or(ConfigError::Missing("DISCORD_BOT_TOKEN"))?;

        let guild_id = get("GUILD_ID")
            .map(|v| GuildId::new(v.trim()))
            .ok_or(ConfigError::Missing("GUILD_ID"))?;

        let target_role_id = get("TARGET_ROLE_ID")
            .map(|v| RoleId::new(v.trim()))
            .ok_or(ConfigError::Missing("TARGET_ROLE_ID"))?;

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            request_body_limit_bytes,
            request_timeout: Duration::from_secs(request_timeout_seconds),
            discord_api_base,
            bot_token,
            guild_id,
            target_role_id,
        })
    }
}
