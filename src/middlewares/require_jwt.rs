/*!
 * JWT 认证中间件
 *
 * 令牌来源依次为 HttpOnly Cookie `token` 与 `Authorization: Bearer <JWT>`。
 * 通过校验后，当前用户（`User`）写入请求扩展，处理程序用
 * `RequireJWT::extract_user_claims` 等方法读取。
 *
 * ```rust,ignore
 * web::scope("/api/plans")
 *     .wrap(RequireJWT)
 *     .route("", web::get().to(list_plans))
 * ```
 *
 * 用户信息按 `user:{id}` 缓存，用户被修改、删除或注销时需要清除该键。
 */

use crate::cache::{CacheResult, ObjectCache, user_cache_key};
use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::models::users::entities::{self, UserRole};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error, info};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireJWT;

/// 认证失败原因
enum AuthFailure {
    Unauthenticated(String),
    Inactive,
    Internal(String),
}

// 先查缓存，未命中再查库并回填
async fn load_user(req: &ServiceRequest, user_id: i64) -> Result<entities::User, AuthFailure> {
    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|c| c.get_ref().clone());
    let key = user_cache_key(user_id);

    if let Some(cache) = &cache {
        match cache.get_raw(&key).await {
            CacheResult::Found(json) => match serde_json::from_str::<entities::User>(&json) {
                Ok(user) => {
                    debug!("User {} loaded from cache", user_id);
                    return Ok(user);
                }
                Err(_) => cache.remove(&key).await,
            },
            CacheResult::NotFound | CacheResult::ExistsButNoValue => {}
        }
    }

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|s| s.get_ref().clone())
        .ok_or_else(|| AuthFailure::Internal("Storage not configured".to_string()))?;

    let user = storage
        .get_user_by_id(user_id)
        .await
        .map_err(|e| AuthFailure::Internal(e.to_string()))?
        .ok_or_else(|| AuthFailure::Unauthenticated("User not found".to_string()))?;

    if let Some(cache) = &cache
        && let Ok(user_json) = serde_json::to_string(&user)
    {
        cache
            .insert_raw(key, user_json, AppConfig::get().cache.default_ttl)
            .await;
    }

    Ok(user)
}

async fn authenticate(req: &ServiceRequest) -> Result<entities::User, AuthFailure> {
    let token = JwtUtils::extract_access_token(req.request())
        .ok_or_else(|| AuthFailure::Unauthenticated("Missing access token".to_string()))?;

    let claims = JwtUtils::verify_access_token(&token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        AuthFailure::Unauthenticated("Invalid or expired token".to_string())
    })?;

    let user_id = claims
        .user_id()
        .ok_or_else(|| AuthFailure::Unauthenticated("Invalid subject in token".to_string()))?;

    let user = load_user(req, user_id).await?;
    if user.status != entities::UserStatus::Active {
        return Err(AuthFailure::Inactive);
    }
    Ok(user)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // CORS 预检不带凭证
            if req.method() == actix_web::http::Method::OPTIONS {
                let res = srv.call(req).await?.map_into_left_body();
                return Ok(res);
            }

            let (status, code, message) = match authenticate(&req).await {
                Ok(user) => {
                    debug!("JWT authentication successful for ID: {}", user.id);
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?.map_into_left_body();
                    return Ok(res);
                }
                Err(AuthFailure::Unauthenticated(reason)) => {
                    info!("JWT authentication failed for {}: {}", req.path(), reason);
                    (
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        format!("Unauthorized: {reason}"),
                    )
                }
                Err(AuthFailure::Inactive) => {
                    info!("Inactive user rejected on {}", req.path());
                    (
                        StatusCode::FORBIDDEN,
                        ErrorCode::UserInactive,
                        "User account is inactive".to_string(),
                    )
                }
                Err(AuthFailure::Internal(reason)) => {
                    error!("Authentication lookup failed: {}", reason);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorCode::InternalServerError,
                        "Authentication lookup failed".to_string(),
                    )
                }
            };

            Ok(req.into_response(
                create_error_response(status, code, &message).map_into_right_body(),
            ))
        })
    }
}

impl RequireJWT {
    /// 当前用户，仅在 RequireJWT 之后的处理程序中可用
    pub fn extract_user_claims(req: &actix_web::HttpRequest) -> Option<entities::User> {
        req.extensions().get::<entities::User>().cloned()
    }

    pub fn extract_user_id(req: &actix_web::HttpRequest) -> Option<i64> {
        req.extensions().get::<entities::User>().map(|user| user.id)
    }

    pub fn extract_user_role(req: &actix_web::HttpRequest) -> Option<UserRole> {
        req.extensions()
            .get::<entities::User>()
            .map(|user| user.role.clone())
    }
}
