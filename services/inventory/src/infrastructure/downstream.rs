//! 下游 HTTP 响应解码

use reqwest::{Response, StatusCode};
use serde_json::Value;

use crate::domain::DownstreamError;

/// 将下游响应解码为 JSON 载荷或带标签的失败
///
/// - 2xx：空响应体返回 `Value::Null`，非 JSON 响应体原样作为字符串返回
/// - 非 2xx 且响应体为 JSON 对象：`Rejected`，取 `message` 与 `errors`
/// - 其他非 2xx：传输失败
pub async fn decode_json(response: Response) -> Result<Value, DownstreamError> {
    let status = response.status();
    let body = read_body(response).await?;
    if status.is_success() {
        Ok(payload(&body))
    } else {
        Err(rejection(status, &body))
    }
}

/// 只关心状态码的调用（删除、通知）：2xx 即成功，响应体被忽略
pub async fn expect_success(response: Response) -> Result<(), DownstreamError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = read_body(response).await?;
    Err(rejection(status, &body))
}

pub fn send_error(err: reqwest::Error) -> DownstreamError {
    DownstreamError::transport(err.to_string())
}

async fn read_body(response: Response) -> Result<Vec<u8>, DownstreamError> {
    response
        .bytes()
        .await
        .map(|bytes| bytes.to_vec())
        .map_err(|e| DownstreamError::transport(e.to_string()))
}

fn payload(body: &[u8]) -> Value {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

fn rejection(status: StatusCode, body: &[u8]) -> DownstreamError {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => DownstreamError::Rejected {
            status: status.as_u16(),
            message: map.get("message").and_then(Value::as_str).map(str::to_owned),
            detail: map.get("errors").filter(|v| !v.is_null()).cloned(),
        },
        _ => DownstreamError::transport(format!(
            "downstream responded with {} and an unreadable body",
            status
        )),
    }
}
