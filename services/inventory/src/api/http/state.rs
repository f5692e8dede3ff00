use std::sync::Arc;

use brew_auth_core::TokenService;
use brew_config::{AppConfig, ConfigError};
use secrecy::ExposeSecret;

use crate::application::{InventoryService, NotificationPolicy};
use crate::infrastructure::{BreweryApiClient, HttpLowStockNotifier};

/// 路由共享状态
#[derive(Clone)]
pub struct AppState {
    pub inventory: Arc<InventoryService>,
    /// 未配置 JWT 密钥时为 None，受保护路由一律拒绝
    pub tokens: Option<TokenService>,
}

impl AppState {
    pub fn new(inventory: Arc<InventoryService>, tokens: Option<TokenService>) -> Self {
        Self { inventory, tokens }
    }

    /// 根据配置装配下游客户端；HTTP 客户端由调用方创建并共享
    pub fn from_config(config: &AppConfig, http: reqwest::Client) -> Result<Self, ConfigError> {
        let gateway = BreweryApiClient::new(http.clone(), config.brewery_api_base()?);
        let notifier = HttpLowStockNotifier::new(http, config.notification_base()?);
        let policy = NotificationPolicy::from_fail_on_error(config.notification.fail_on_error);

        let inventory = InventoryService::new(Arc::new(gateway), Arc::new(notifier), policy);
        let tokens = config
            .jwt_secret
            .as_ref()
            .map(|secret| TokenService::new(secret.expose_secret()));

        Ok(Self::new(Arc::new(inventory), tokens))
    }
}
