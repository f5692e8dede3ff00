//! brew-auth-core - 认证核心库
//!
//! 校验调用方携带的 HS256 JWT

use brew_errors::{AppError, AppResult};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 用户标识：签发方可能写入数字或字符串
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    Number(i64),
    Text(String),
}

impl fmt::Display for UserRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRef::Number(n) => write!(f, "{}", n),
            UserRef::Text(s) => write!(f, "{}", s),
        }
    }
}

/// JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Expiration time
    pub exp: i64,
    /// Issued at
    #[serde(default)]
    pub iat: i64,
}

impl Claims {
    pub fn new(id: Option<UserRef>, email: Option<String>, expires_in_secs: i64) -> Self {
        let now = Utc::now();
        Self {
            id,
            email,
            exp: (now + Duration::seconds(expires_in_secs)).timestamp(),
            iat: now.timestamp(),
        }
    }

    /// 日志中使用的调用方描述
    pub fn principal(&self) -> String {
        match (&self.id, &self.email) {
            (Some(id), _) => id.to_string(),
            (None, Some(email)) => email.clone(),
            (None, None) => "anonymous".to_string(),
        }
    }
}

/// Token 服务
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// 签发令牌
    pub fn generate_token(&self, claims: &Claims) -> AppResult<String> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))
    }

    /// 验证令牌
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::unauthorized(format!("Invalid token: {}", e)))
    }
}
