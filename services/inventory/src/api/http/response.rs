//! 响应映射
//!
//! 将用例结果统一映射为对外的状态码与 JSON 响应体。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use brew_errors::{AppError, ErrorBody};
use metrics::counter;
use serde_json::Value;
use tracing::{error, warn};

use crate::application::InventoryError;
use crate::domain::DownstreamError;

/// 对外暴露的操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    AddProduct,
    GetProduct,
    UpdateProduct,
    DeleteProduct,
    ListProducts,
    UpdateStock,
    LowStock,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Self::AddProduct => "add_product",
            Self::GetProduct => "get_product",
            Self::UpdateProduct => "update_product",
            Self::DeleteProduct => "delete_product",
            Self::ListProducts => "list_products",
            Self::UpdateStock => "update_stock",
            Self::LowStock => "low_stock",
        }
    }

    pub fn success_status(self) -> StatusCode {
        match self {
            Self::AddProduct => StatusCode::CREATED,
            _ => StatusCode::OK,
        }
    }

    /// 下游无结构化响应时使用的状态码
    pub fn fallback_status(self) -> StatusCode {
        match self {
            Self::GetProduct | Self::UpdateProduct | Self::DeleteProduct => StatusCode::NOT_FOUND,
            Self::AddProduct | Self::ListProducts | Self::UpdateStock | Self::LowStock => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::AddProduct => "Error adding product",
            Self::GetProduct | Self::UpdateProduct | Self::DeleteProduct => "Product not found",
            Self::ListProducts => "Error fetching products",
            Self::UpdateStock => "Error updating stock",
            Self::LowStock => "Error fetching low stock",
        }
    }
}

pub fn respond(op: Operation, result: Result<Value, InventoryError>) -> Response {
    match result {
        Ok(body) => success(op, body),
        Err(err) => failure(op, err),
    }
}

pub fn success(op: Operation, body: Value) -> Response {
    (op.success_status(), Json(body)).into_response()
}

pub fn failure(op: Operation, err: InventoryError) -> Response {
    match err {
        InventoryError::Validation(violations) => {
            warn!(
                operation = op.name(),
                fields = ?violations.fields(),
                "Request failed validation"
            );
            (StatusCode::BAD_REQUEST, Json(violations)).into_response()
        }
        InventoryError::Downstream(err) => downstream_failure(op, err),
    }
}

fn downstream_failure(op: Operation, err: DownstreamError) -> Response {
    counter!("inventory_downstream_failures_total", "operation" => op.name()).increment(1);

    match err {
        DownstreamError::Rejected {
            status,
            message,
            detail,
        } => {
            error!(
                operation = op.name(),
                status,
                message = ?message,
                detail = ?detail,
                "Downstream rejected request"
            );
            let status = StatusCode::from_u16(status).unwrap_or(op.fallback_status());
            let body = ErrorBody {
                message: message.unwrap_or_else(|| op.fallback_message().to_string()),
                error: detail,
            };
            (status, Json(body)).into_response()
        }
        DownstreamError::Transport(text) => {
            error!(operation = op.name(), error = %text, "Downstream call failed");
            let body = ErrorBody::new(op.fallback_message()).with_error(text);
            (op.fallback_status(), Json(body)).into_response()
        }
    }
}

/// 认证、请求体解析等本地错误
pub fn app_error(err: AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(err.to_error_body())).into_response()
}
