//! HTTP 接口

pub mod handlers;
pub mod middleware;
pub mod response;
pub mod state;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// 构建服务路由：`/healthcheck` 与挂载在 `/inventory` 下的库存接口
pub fn router(state: AppState) -> Router {
    let auth = from_fn_with_state(state.clone(), middleware::require_bearer);

    let inventory = Router::new()
        .route("/", get(handlers::list_products))
        .route(
            "/add-product",
            post(handlers::add_product).route_layer(auth.clone()),
        )
        .route(
            "/low-stock",
            get(handlers::low_stock_products).route_layer(auth.clone()),
        )
        .route(
            "/{id}",
            get(handlers::get_product).merge(
                put(handlers::update_product)
                    .delete(handlers::delete_product)
                    .route_layer(auth.clone()),
            ),
        )
        .route(
            "/{id}/stock",
            put(handlers::update_stock).route_layer(auth),
        );

    Router::new()
        .route("/healthcheck", get(handlers::healthcheck))
        .nest("/inventory", inventory)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
