//! 外部服务抽象接口

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use super::product::{NewProduct, StockAdjustment};

/// 调用方的 bearer 令牌，原样转发给下游
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

/// 单次请求的调用上下文
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallContext {
    pub credential: Option<Credential>,
}

impl CallContext {
    pub fn new(credential: Option<Credential>) -> Self {
        Self { credential }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_bearer(token: impl Into<String>) -> Self {
        Self::new(Some(Credential::bearer(token)))
    }
}

/// 下游调用失败
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DownstreamError {
    /// 下游以非 2xx 状态码和结构化响应体拒绝了请求
    #[error("downstream rejected the request with status {status}")]
    Rejected {
        status: u16,
        message: Option<String>,
        detail: Option<Value>,
    },

    /// 下游不可达，或响应体无法解析
    #[error("{0}")]
    Transport(String),
}

impl DownstreamError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}

/// 库存记录的系统（下游 brewery API）
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryGateway: Send + Sync {
    async fn create_product(
        &self,
        product: &NewProduct,
        ctx: &CallContext,
    ) -> Result<Value, DownstreamError>;

    async fn get_product(&self, id: &str, ctx: &CallContext) -> Result<Value, DownstreamError>;

    async fn update_product(
        &self,
        id: &str,
        changes: &Value,
        ctx: &CallContext,
    ) -> Result<Value, DownstreamError>;

    async fn delete_product(&self, id: &str, ctx: &CallContext) -> Result<(), DownstreamError>;

    async fn list_products(&self, ctx: &CallContext) -> Result<Value, DownstreamError>;

    async fn list_low_stock(&self, ctx: &CallContext) -> Result<Value, DownstreamError>;

    /// 应用库存增减量并返回更新后的产品
    async fn update_stock(
        &self,
        id: &str,
        adjustment: &StockAdjustment,
        ctx: &CallContext,
    ) -> Result<Value, DownstreamError>;
}

/// 低库存通知服务
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LowStockNotifier: Send + Sync {
    async fn notify_low_stock(&self, product_id: &str) -> Result<(), DownstreamError>;
}
