//! 进程内的 Brewery API 与通知服务模拟
//!
//! 每个模拟服务绑定随机端口并记录收到的请求，测试可同时断言响应与出站调用。

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    body::{Body, to_bytes},
    extract::{Path, Request, State},
    http::{Method, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use brew_auth_core::{Claims, TokenService, UserRef};
use inventory_service::api::http::{AppState, router};
use inventory_service::application::{InventoryService, NotificationPolicy};
use inventory_service::infrastructure::{BreweryApiClient, HttpLowStockNotifier};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tower::ServiceExt;
use url::Url;

pub const TEST_SECRET: &str = "inventory-test-secret";

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
}

#[derive(Default)]
struct BreweryState {
    products: BTreeMap<u64, Value>,
    next_id: u64,
    calls: Vec<RecordedCall>,
    stock_bodies: Vec<Value>,
    created_bodies: Vec<Value>,
    /// 设置后所有请求都以该状态码与响应体应答
    forced: Option<(StatusCode, String)>,
}

type Shared<T> = Arc<Mutex<T>>;

async fn serve(app: Router) -> (SocketAddr, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock server");
    let addr = listener.local_addr().expect("Failed to get local address");
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock server failed");
    });
    (addr, handle)
}

/// 以内存产品表为后端的 Brewery 库存 API 模拟
pub struct MockBreweryApi {
    state: Shared<BreweryState>,
    _handle: JoinHandle<()>,
    addr: SocketAddr,
}

impl MockBreweryApi {
    pub async fn start() -> Self {
        let state: Shared<BreweryState> = Arc::new(Mutex::new(BreweryState {
            next_id: 1,
            ..Default::default()
        }));

        let app = Router::new()
            .route(
                "/api/inventory",
                get(list_products).post(create_product),
            )
            .route("/api/inventory/low-stock", get(low_stock))
            .route(
                "/api/inventory/{id}",
                get(get_product).put(update_product).delete(delete_product),
            )
            .route("/api/inventory/{id}/stock", axum::routing::put(update_stock))
            .layer(middleware::from_fn_with_state(state.clone(), record_call))
            .with_state(state.clone());

        let (addr, handle) = serve(app).await;
        Self {
            state,
            _handle: handle,
            addr,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// 直接写入一个产品并返回其 id
    pub async fn seed(&self, mut product: Value) -> u64 {
        let mut state = self.state.lock().await;
        let id = state.next_id;
        state.next_id += 1;
        product["id"] = json!(id);
        state.products.insert(id, product);
        id
    }

    pub async fn force_response(&self, status: StatusCode, body: &str) {
        self.state.lock().await.forced = Some((status, body.to_string()));
    }

    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().await.calls.clone()
    }

    pub async fn stock_bodies(&self) -> Vec<Value> {
        self.state.lock().await.stock_bodies.clone()
    }

    pub async fn created_bodies(&self) -> Vec<Value> {
        self.state.lock().await.created_bodies.clone()
    }
}

async fn record_call(
    State(state): State<Shared<BreweryState>>,
    request: Request,
    next: Next,
) -> Response {
    let call = RecordedCall {
        method: request.method().clone(),
        path: request.uri().path().to_string(),
        authorization: request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .map(str::to_owned),
    };

    let forced = {
        let mut state = state.lock().await;
        state.calls.push(call);
        state.forced.clone()
    };

    match forced {
        Some((status, body)) => (status, body).into_response(),
        None => next.run(request).await,
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Product not found" })),
    )
        .into_response()
}

fn number(product: &Value, field: &str) -> i64 {
    product.get(field).and_then(Value::as_i64).unwrap_or(0)
}

async fn list_products(State(state): State<Shared<BreweryState>>) -> Json<Value> {
    let state = state.lock().await;
    Json(Value::Array(state.products.values().cloned().collect()))
}

async fn low_stock(State(state): State<Shared<BreweryState>>) -> Json<Value> {
    let state = state.lock().await;
    let low = state
        .products
        .values()
        .filter(|p| number(p, "stockQuantity") <= number(p, "reorderPoint"))
        .cloned()
        .collect();
    Json(Value::Array(low))
}

async fn create_product(
    State(state): State<Shared<BreweryState>>,
    Json(mut body): Json<Value>,
) -> Response {
    let mut state = state.lock().await;
    state.created_bodies.push(body.clone());
    let id = state.next_id;
    state.next_id += 1;
    body["id"] = json!(id);
    state.products.insert(id, body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn get_product(State(state): State<Shared<BreweryState>>, Path(id): Path<u64>) -> Response {
    let state = state.lock().await;
    match state.products.get(&id) {
        Some(product) => Json(product.clone()).into_response(),
        None => not_found(),
    }
}

async fn update_product(
    State(state): State<Shared<BreweryState>>,
    Path(id): Path<u64>,
    Json(changes): Json<Value>,
) -> Response {
    let mut state = state.lock().await;
    let Some(product) = state.products.get_mut(&id) else {
        return not_found();
    };
    if let (Some(target), Some(changes)) = (product.as_object_mut(), changes.as_object()) {
        for (key, value) in changes {
            target.insert(key.clone(), value.clone());
        }
    }
    Json(product.clone()).into_response()
}

async fn delete_product(
    State(state): State<Shared<BreweryState>>,
    Path(id): Path<u64>,
) -> Response {
    let mut state = state.lock().await;
    match state.products.remove(&id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => not_found(),
    }
}

async fn update_stock(
    State(state): State<Shared<BreweryState>>,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().await;
    state.stock_bodies.push(body.clone());
    let delta = body.get("Quantity").and_then(Value::as_i64).unwrap_or(0);
    let Some(product) = state.products.get_mut(&id) else {
        return not_found();
    };
    let stock = number(product, "stockQuantity") + delta;
    product["stockQuantity"] = json!(stock);
    Json(product.clone()).into_response()
}

#[derive(Default)]
struct NotificationState {
    received: Vec<Value>,
    failing: bool,
    text_reply: Option<String>,
}

/// 记录低库存请求的通知服务模拟
pub struct MockNotificationService {
    state: Shared<NotificationState>,
    _handle: JoinHandle<()>,
    addr: SocketAddr,
}

impl MockNotificationService {
    pub async fn start() -> Self {
        let state: Shared<NotificationState> = Arc::default();
        let app = Router::new()
            .route("/notifications/low-stock", post(handle_low_stock))
            .with_state(state.clone());

        let (addr, handle) = serve(app).await;
        Self {
            state,
            _handle: handle,
            addr,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn set_failing(&self, failing: bool) {
        self.state.lock().await.failing = failing;
    }

    /// 成功时以纯文本而非 JSON 应答
    pub async fn reply_with_text(&self, text: &str) {
        self.state.lock().await.text_reply = Some(text.to_string());
    }

    pub async fn received(&self) -> Vec<Value> {
        self.state.lock().await.received.clone()
    }
}

async fn handle_low_stock(
    State(state): State<Shared<NotificationState>>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().await;
    state.received.push(body);
    if state.failing {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "message": "Notification service unavailable" })),
        )
            .into_response()
    } else if let Some(text) = state.text_reply.clone() {
        (StatusCode::OK, text).into_response()
    } else {
        Json(json!({ "status": "queued" })).into_response()
    }
}

/// 连接两个模拟服务的库存路由
pub struct TestApp {
    pub router: Router,
    pub brewery: MockBreweryApi,
    pub notifications: MockNotificationService,
    pub tokens: TokenService,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_policy(NotificationPolicy::BestEffort).await
    }

    pub async fn spawn_with_policy(policy: NotificationPolicy) -> Self {
        let brewery = MockBreweryApi::start().await;
        let notifications = MockNotificationService::start().await;
        let router = build_router(&brewery.url(), &notifications.url(), policy, true);

        Self {
            router,
            brewery,
            notifications,
            tokens: TokenService::new(TEST_SECRET),
        }
    }

    pub fn bearer(&self) -> String {
        self.tokens
            .generate_token(&Claims::new(
                Some(UserRef::Number(1)),
                Some("test@example.com".to_string()),
                3600,
            ))
            .expect("token")
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        send(&self.router, method, uri, token, body).await
    }
}

pub fn build_router(
    brewery_url: &str,
    notification_url: &str,
    policy: NotificationPolicy,
    with_auth: bool,
) -> Router {
    let http = reqwest::Client::new();
    let gateway =
        BreweryApiClient::new(http.clone(), Url::parse(brewery_url).expect("brewery url"));
    let notifier =
        HttpLowStockNotifier::new(http, Url::parse(notification_url).expect("notification url"));
    let inventory = InventoryService::new(Arc::new(gateway), Arc::new(notifier), policy);
    let tokens = with_auth.then(|| TokenService::new(TEST_SECRET));
    router(AppState::new(Arc::new(inventory), tokens))
}

pub fn bearer_for_test_secret() -> String {
    TokenService::new(TEST_SECRET)
        .generate_token(&Claims::new(Some(UserRef::Number(1)), None, 3600))
        .expect("token")
}

pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = axum::http::Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let response = router.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}
