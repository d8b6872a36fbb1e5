use std::sync::Arc;

use hrm_core::services::PermissionService;
use hrm_shared::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PermissionService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(service: PermissionService, config: AppConfig) -> Self {
        Self {
            service: Arc::new(service),
            config: Arc::new(config),
        }
    }
}
