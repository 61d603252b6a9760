/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - ex: role_check: RoleCheckService (client + guild / role), app_env
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 * - 起動後は read-only (request 間で共有する mutable state はない)
 */
use std::sync::Arc;

use crate::config::AppEnv;
use crate::services::role_check::RoleCheckService;

#[derive(Clone, Debug)]
pub struct AppState {
    pub app_env: AppEnv,
    pub role_check: Arc<RoleCheckService>,
}

impl AppState {
    pub fn new(app_env: AppEnv, role_check: Arc<RoleCheckService>) -> Self {
        Self {
            app_env,
            role_check,
        }
    }
}
