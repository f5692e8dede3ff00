//! brew-telemetry - 日志与指标初始化

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// 人类可读格式（开发环境）
    Pretty,
    /// 每行一个 JSON 对象（生产环境）
    Json,
}

// RUST_LOG 优先于配置的日志级别
fn env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level))
}

/// 初始化全局 tracing subscriber
pub fn init_tracing(log_level: &str, format: LogFormat) {
    let registry = tracing_subscriber::registry().with(env_filter(log_level));
    match format {
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
    }
    tracing::debug!(?format, log_level, "Tracing initialized");
}

/// 安装全局 Prometheus recorder，返回用于渲染 `/metrics` 的句柄
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}
