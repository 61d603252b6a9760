/*
 * Responsibility
 * - guild / target role を保持し、lookup → membership test を一回だけ行う
 * - retry / cache はしない (失敗はそのまま上位へ)
 */
use std::sync::Arc;

use tracing::info;

use crate::services::discord::{GuildId, LookupResult, MembershipClient, RoleId, UserId};

/// Exact string match. No case folding, no prefix matching.
pub fn has_role(roles: &[RoleId], target: &RoleId) -> bool {
    roles.iter().any(|role| role == target)
}

#[derive(Debug)]
pub struct RoleCheckService {
    client: Arc<dyn MembershipClient>,
    guild_id: GuildId,
    target_role_id: RoleId,
}

impl RoleCheckService {
    pub fn new(client: Arc<dyn MembershipClient>, guild_id: GuildId, target_role_id: RoleId) -> Self {
        Self {
            client,
            guild_id,
            target_role_id,
        }
    }

    pub fn guild_id(&self) -> &GuildId {
        &self.guild_id
    }

    pub fn target_role_id(&self) -> &RoleId {
        &self.target_role_id
    }

    pub async fn check(&self, user_id: &UserId) -> LookupResult<bool> {
        let roles = self
            .client
            .fetch_member_roles(&self.guild_id, user_id)
            .await?;

        let found = has_role(&roles, &self.target_role_id);
        info!(
            backend = self.client.backend_name(),
            %user_id,
            has_role = found,
            role_count = roles.len(),
            "role check completed"
        );
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::services::discord::LookupError;

    fn roles(ids: &[&str]) -> Vec<RoleId> {
        ids.iter().map(|id| RoleId::new(*id)).collect()
    }

    #[test]
    fn has_role_is_exact_match() {
        let target = RoleId::new("222");

        assert!(has_role(&roles(&["999", "222"]), &target));
        assert!(!has_role(&roles(&[]), &target));
        assert!(!has_role(&roles(&["2222", "22", " 222"]), &target));
    }

    #[test]
    fn has_role_does_not_fold_case() {
        assert!(!has_role(&roles(&["Admin"]), &RoleId::new("admin")));
    }

    #[derive(Debug)]
    struct Fixed(LookupResult<Vec<RoleId>>);

    #[async_trait]
    impl MembershipClient for Fixed {
        fn backend_name(&self) -> &'static str {
            "fixed"
        }

        async fn fetch_member_roles(
            &self,
            _guild_id: &GuildId,
            _user_id: &UserId,
        ) -> LookupResult<Vec<RoleId>> {
            self.0.clone()
        }
    }

    fn service(result: LookupResult<Vec<RoleId>>) -> RoleCheckService {
        RoleCheckService::new(
            Arc::new(Fixed(result)),
            GuildId::new("1"),
            RoleId::new("222"),
        )
    }

    #[tokio::test]
    async fn check_reports_membership() {
        let svc = service(Ok(roles(&["999", "222"])));
        assert!(svc.check(&UserId::new("111")).await.unwrap());

        let svc = service(Ok(roles(&["111"])));
        assert!(!svc.check(&UserId::new("555")).await.unwrap());
    }

    #[tokio::test]
    async fn check_propagates_upstream_rejection() {
        let rejected = LookupError::Rejected {
            status: 404,
            body: "Unknown Member".to_string(),
        };
        let svc = service(Err(rejected.clone()));

        assert_eq!(svc.check(&UserId::new("1")).await.unwrap_err(), rejected);
    }
}
