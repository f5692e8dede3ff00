//! brew-errors - 统一错误处理
//!
//! 服务对外的错误响应统一为 `{ "message": ..., "error": ... }`

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// 转换为 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::Configuration(_) => 500,
            Self::Internal(_) => 500,
        }
    }

    /// 面向调用方的简短消息（不含变体前缀）
    pub fn public_message(&self) -> &str {
        match self {
            Self::Unauthorized(m) | Self::Configuration(m) | Self::Internal(m) => m,
        }
    }

    /// 转换为错误响应体
    pub fn to_error_body(&self) -> ErrorBody {
        ErrorBody::new(self.public_message())
    }
}

/// 错误响应体
///
/// `error` 缺省时不序列化，与下游未提供错误详情的情形一致。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<serde_json::Value>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// Result 类型别名
pub type AppResult<T> = Result<T, AppError>;
