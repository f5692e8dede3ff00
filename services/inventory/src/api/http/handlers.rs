//! 库存路由处理器

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use brew_errors::ErrorBody;
use serde_json::{Value, json};
use tracing::{info, warn};

use super::middleware::{AuthClaims, Caller};
use super::response::{Operation, failure, respond, success};
use super::state::AppState;

pub const HEALTH_MESSAGE: &str = "The Inventory Service is ALIVE!";

pub async fn healthcheck() -> (StatusCode, &'static str) {
    (StatusCode::OK, HEALTH_MESSAGE)
}

fn invalid_json(rejection: JsonRejection) -> Response {
    warn!(error = %rejection.body_text(), "Rejected malformed JSON body");
    let body = ErrorBody::new("Invalid JSON body").with_error(rejection.body_text());
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

pub async fn add_product(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Caller(ctx): Caller,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return invalid_json(rejection),
    };
    info!(principal = %claims.principal(), "Adding product");
    respond(Operation::AddProduct, state.inventory.add_product(&body, &ctx).await)
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Caller(ctx): Caller,
) -> Response {
    respond(Operation::GetProduct, state.inventory.get_product(&id, &ctx).await)
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AuthClaims(claims): AuthClaims,
    Caller(ctx): Caller,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Json(changes) = match body {
        Ok(body) => body,
        Err(rejection) => return invalid_json(rejection),
    };
    info!(principal = %claims.principal(), product_id = %id, "Updating product");
    respond(
        Operation::UpdateProduct,
        state.inventory.update_product(&id, &changes, &ctx).await,
    )
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AuthClaims(claims): AuthClaims,
    Caller(ctx): Caller,
) -> Response {
    info!(principal = %claims.principal(), product_id = %id, "Deleting product");
    match state.inventory.delete_product(&id, &ctx).await {
        Ok(()) => success(
            Operation::DeleteProduct,
            json!({ "message": "Product deleted successfully" }),
        ),
        Err(err) => failure(Operation::DeleteProduct, err),
    }
}

pub async fn list_products(State(state): State<AppState>, Caller(ctx): Caller) -> Response {
    respond(Operation::ListProducts, state.inventory.list_products(&ctx).await)
}

pub async fn low_stock_products(
    State(state): State<AppState>,
    AuthClaims(_claims): AuthClaims,
    Caller(ctx): Caller,
) -> Response {
    respond(Operation::LowStock, state.inventory.low_stock_products(&ctx).await)
}

pub async fn update_stock(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AuthClaims(claims): AuthClaims,
    Caller(ctx): Caller,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return invalid_json(rejection),
    };
    info!(principal = %claims.principal(), product_id = %id, "Updating stock");
    match state.inventory.update_stock(&id, &body, &ctx).await {
        Ok(update) => success(
            Operation::UpdateStock,
            json!({ "message": "Stock updated successfully", "product": update.product }),
        ),
        Err(err) => failure(Operation::UpdateStock, err),
    }
}
