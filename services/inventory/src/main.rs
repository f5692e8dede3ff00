//! Brewery Inventory Service

use anyhow::Context;
use axum::routing::get;
use brew_config::{AppConfig, load_dotenv};
use brew_telemetry::{LogFormat, init_metrics, init_tracing};
use inventory_service::api::http::{AppState, router};
use inventory_service::shutdown::shutdown_signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载 .env 与配置
    load_dotenv();
    let config = AppConfig::load().context("Failed to load configuration")?;

    // 初始化 tracing 与 metrics
    let log_format = if config.is_production() {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_tracing(&config.telemetry.log_level, log_format);
    let metrics = init_metrics().context("Failed to install Prometheus recorder")?;

    if config.jwt_secret.is_none() {
        warn!("JWT_SECRET is not set; protected routes will reject every request");
    }

    // 共享的出站 HTTP 客户端
    let http = reqwest::Client::builder()
        .build()
        .context("Failed to build HTTP client")?;
    let state = AppState::from_config(&config, http)?;

    let app = router(state).route(
        "/metrics",
        get(move || std::future::ready(metrics.render())),
    );

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(
        %addr,
        environment = %config.environment,
        brewery_api = %config.brewery_api_url,
        notification_service = %config.notification.url,
        "Inventory service listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Inventory service stopped");
    Ok(())
}
