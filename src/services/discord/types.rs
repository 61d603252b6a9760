//! Opaque Discord identifiers and the subset of the guild member payload we read.
//!
//! Ids are kept as strings. Snowflakes exceed the safe integer range of
//! most JSON consumers, and role ids are compared by exact string match.
use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// A user identifier as supplied by the caller. Never empty once extracted.
    UserId
);
string_id!(GuildId);
string_id!(RoleId);

impl UserId {
    /// `.` / `..` are normalized away when pushed as a URL path segment.
    pub fn is_dot_segment(value: &str) -> bool {
        matches!(value, "." | "..")
    }
}

/// `GET /guilds/{guild.id}/members/{user.id}` response. Only `roles` is consulted.
#[derive(Debug, Deserialize)]
pub struct MembershipRecord {
    pub roles: Vec<RoleId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_record_ignores_unrelated_fields() {
        let record: MembershipRecord = serde_json::from_str(
            r#"{"user":{"id":"111","username":"x"},"nick":null,"roles":["999","222"],"joined_at":"2025-01-01T00:00:00Z"}"#,
        )
        .unwrap();

        assert_eq!(record.roles, vec![RoleId::new("999"), RoleId::new("222")]);
    }

    #[test]
    fn membership_record_requires_roles() {
        assert!(serde_json::from_str::<MembershipRecord>(r#"{"user":{"id":"1"}}"#).is_err());
        assert!(serde_json::from_str::<MembershipRecord>(r#"{"roles":[1,2]}"#).is_err());
    }

    #[test]
    fn dot_segments_are_detected() {
        assert!(UserId::is_dot_segment("."));
        assert!(UserId::is_dot_segment(".."));
        assert!(!UserId::is_dot_segment("..."));
        assert!(!UserId::is_dot_segment("1.2"));
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&UserId::new("777")).unwrap();
        assert_eq!(json, r#""777""#);
    }
}
