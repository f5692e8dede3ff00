//! 低库存通知服务客户端

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use url::Url;

use super::downstream::{expect_success, send_error};
use crate::domain::{DownstreamError, LowStockNotifier};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LowStockRequest<'a> {
    product_id: &'a str,
}

#[derive(Clone)]
pub struct HttpLowStockNotifier {
    http: Client,
    endpoint: Url,
}

impl HttpLowStockNotifier {
    pub fn new(http: Client, base_url: Url) -> Self {
        let mut endpoint = base_url;
        if let Ok(mut path) = endpoint.path_segments_mut() {
            path.pop_if_empty().extend(["notifications", "low-stock"]);
        }
        Self { http, endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl LowStockNotifier for HttpLowStockNotifier {
    async fn notify_low_stock(&self, product_id: &str) -> Result<(), DownstreamError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&LowStockRequest { product_id })
            .send()
            .await
            .map_err(send_error)?;
        expect_success(response).await
    }
}
