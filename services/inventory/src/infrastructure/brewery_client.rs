//! Brewery API 客户端
//!
//! 每次调用只发送一次请求，不做重试。

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::downstream::{decode_json, expect_success, send_error};
use crate::domain::{
    CallContext, DownstreamError, InventoryGateway, NewProduct, StockAdjustment,
};

#[derive(Clone)]
pub struct BreweryApiClient {
    http: Client,
    base_url: Url,
}

impl BreweryApiClient {
    pub fn new(http: Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// 在基础地址后追加路径段；路径段会被百分号编码
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str], ctx: &CallContext) -> RequestBuilder {
        let url = self.endpoint(segments);
        debug!(%method, %url, "Calling brewery API");
        let builder = self.http.request(method, url);
        match &ctx.credential {
            Some(credential) => builder.bearer_auth(credential.token()),
            None => builder,
        }
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Value, DownstreamError> {
        let response = builder.send().await.map_err(send_error)?;
        decode_json(response).await
    }
}

#[async_trait]
impl InventoryGateway for BreweryApiClient {
    async fn create_product(
        &self,
        product: &NewProduct,
        ctx: &CallContext,
    ) -> Result<Value, DownstreamError> {
        let req = self
            .request(Method::POST, &["api", "inventory"], ctx)
            .json(product);
        self.execute(req).await
    }

    async fn get_product(&self, id: &str, ctx: &CallContext) -> Result<Value, DownstreamError> {
        let req = self.request(Method::GET, &["api", "inventory", id], ctx);
        self.execute(req).await
    }

    async fn update_product(
        &self,
        id: &str,
        changes: &Value,
        ctx: &CallContext,
    ) -> Result<Value, DownstreamError> {
        let req = self
            .request(Method::PUT, &["api", "inventory", id], ctx)
            .json(changes);
        self.execute(req).await
    }

    async fn delete_product(&self, id: &str, ctx: &CallContext) -> Result<(), DownstreamError> {
        let response = self
            .request(Method::DELETE, &["api", "inventory", id], ctx)
            .send()
            .await
            .map_err(send_error)?;
        expect_success(response).await
    }

    async fn list_products(&self, ctx: &CallContext) -> Result<Value, DownstreamError> {
        let req = self.request(Method::GET, &["api", "inventory"], ctx);
        self.execute(req).await
    }

    async fn list_low_stock(&self, ctx: &CallContext) -> Result<Value, DownstreamError> {
        let req = self.request(Method::GET, &["api", "inventory", "low-stock"], ctx);
        self.execute(req).await
    }

    async fn update_stock(
        &self,
        id: &str,
        adjustment: &StockAdjustment,
        ctx: &CallContext,
    ) -> Result<Value, DownstreamError> {
        let req = self
            .request(Method::PUT, &["api", "inventory", id, "stock"], ctx)
            .json(adjustment);
        self.execute(req).await
    }
}
