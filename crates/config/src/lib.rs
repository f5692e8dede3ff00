//! brew-config - 配置加载库
//!
//! 加载顺序：内置默认值 → `{config_dir}/default.toml` → `{config_dir}/{env}.toml` → 环境变量

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use secrecy::Secret;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),

    #[error("Invalid URL for {field}: {source}")]
    InvalidUrl {
        field: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("Unsupported URL for {field}: {url} (expected an http(s) base address)")]
    UnsupportedUrl { field: &'static str, url: String },
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// 低库存通知配置
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    /// 通知服务的独立地址，不再从库存服务地址推导
    #[serde(default = "default_notification_url")]
    pub url: String,
    /// 为 true 时，通知失败会使整个库存更新请求失败
    #[serde(default)]
    pub fail_on_error: bool,
}

fn default_notification_url() -> String {
    "http://localhost:3005".to_string()
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            url: default_notification_url(),
            fail_on_error: false,
        }
    }
}

/// 遥测配置
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_environment")]
    pub environment: String,
    #[serde(default = "default_brewery_api_url")]
    pub brewery_api_url: String,
    /// JWT 签名密钥；未配置时受保护路由不可用
    #[serde(default)]
    pub jwt_secret: Option<Secret<String>>,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub notification: NotificationConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_brewery_api_url() -> String {
    "http://localhost:5089".to_string()
}

impl AppConfig {
    /// 从 `config/` 目录和环境变量加载配置
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment("config"))
    }

    /// 构建配置源
    pub fn figment(config_dir: &str) -> Figment {
        let env = current_environment().unwrap_or_else(default_environment);

        Figment::new()
            .merge(Toml::file(format!("{}/default.toml", config_dir)))
            .merge(Toml::file(format!("{}/{}.toml", config_dir, env)))
            .merge(Env::raw().filter_map(|key| env_key(key.as_str())))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// 校验需要在启动时失败的配置项
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.brewery_api_base()?;
        self.notification_base()?;
        Ok(())
    }

    pub fn brewery_api_base(&self) -> Result<Url, ConfigError> {
        parse_url("brewery_api_url", &self.brewery_api_url)
    }

    pub fn notification_base(&self) -> Result<Url, ConfigError> {
        parse_url("notification.url", &self.notification.url)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// 加载 `.env.{APP_ENV}` 与 `.env` 文件，文件不存在时忽略
pub fn load_dotenv() {
    let env = current_environment().unwrap_or_else(|| "local".to_string());
    let _ = dotenvy::from_filename(format!(".env.{}", env));
    let _ = dotenvy::dotenv();
}

fn current_environment() -> Option<String> {
    std::env::var("APP_ENV")
        .or_else(|_| std::env::var("NODE_ENV"))
        .ok()
        .filter(|v| !v.is_empty())
}

// 环境变量名 → 配置路径；APP_ENV 优先于 NODE_ENV
fn env_key(key: &str) -> Option<figment::value::Uncased<'static>> {
    let path = match key.to_ascii_uppercase().as_str() {
        "APP_ENV" => "environment",
        "NODE_ENV" if std::env::var("APP_ENV").is_err() => "environment",
        "BREWERY_API_URL" => "brewery_api_url",
        "JWT_SECRET" => "jwt_secret",
        "HOST" => "server.host",
        "PORT" => "server.port",
        "NOTIFICATION_SERVICE_URL" => "notification.url",
        "NOTIFICATION_FAIL_ON_ERROR" => "notification.fail_on_error",
        "LOG_LEVEL" => "telemetry.log_level",
        _ => return None,
    };
    Some(path.into())
}

// 只接受可追加路径段的 http/https 地址
fn parse_url(field: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|source| ConfigError::InvalidUrl { field, source })?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ConfigError::UnsupportedUrl {
            field,
            url: raw.to_string(),
        });
    }
    Ok(url)
}
