/*
 * Responsibility
 * - Discord API 境界の集約 (trait / reqwest 実装 / id 型)
 * - 外部からは re-export 経由で使う
 */
pub mod client;
pub mod http;
pub mod types;

pub use client::{LookupError, LookupResult, MembershipClient};
pub use http::DiscordClient;
pub use types::{GuildId, RoleId, UserId};
