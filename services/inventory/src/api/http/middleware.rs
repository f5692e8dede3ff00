//! 中间件与请求提取器

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use brew_auth_core::Claims;
use brew_errors::AppError;
use tracing::{debug, error, warn};

use super::response::app_error;
use super::state::AppState;
use crate::domain::{CallContext, Credential};

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// JWT 认证中间件
///
/// 验证请求中的 JWT token 并将 claims 注入到请求扩展中
pub async fn require_bearer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(tokens) = state.tokens.as_ref() else {
        error!("JWT secret is not configured; rejecting protected request");
        return app_error(AppError::configuration("Authentication is not configured"));
    };

    let Some(token) = bearer_token(request.headers()).map(str::to_owned) else {
        warn!("Missing or invalid authorization header");
        return app_error(AppError::unauthorized("No token provided"));
    };

    match tokens.validate_token(&token) {
        Ok(claims) => {
            debug!(principal = %claims.principal(), "Token validated");
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            warn!(error = %e, "Token validation failed");
            app_error(AppError::unauthorized("Invalid token"))
        }
    }
}

/// 认证 Claims 提取器
///
/// 应该在 require_bearer 之后使用
pub struct AuthClaims(pub Claims);

impl<S> FromRequestParts<S> for AuthClaims
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthClaims)
            .ok_or_else(|| {
                error!("Missing claims in request extensions (require_bearer may not have run)");
                app_error(AppError::internal("Missing authentication context"))
            })
    }
}

/// 调用方上下文：携带 Authorization 头中的令牌（如有），用于转发给下游
pub struct Caller(pub CallContext);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let credential = bearer_token(&parts.headers).map(Credential::bearer);
        Ok(Caller(CallContext::new(credential)))
    }
}
