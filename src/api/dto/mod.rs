/*
 * Responsibility
 * - response DTO の集約
 * - timestamp 表現 (ISO-8601, millisecond, UTC) を一箇所に固定
 */
pub mod role_check;

use chrono::{DateTime, SecondsFormat, Utc};

/// `2025-01-01T00:00:00.000Z`
pub fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}
