pub mod assignments;
pub mod auth;
pub mod documents;
pub mod plans;
pub mod reports;
pub mod stages;
pub mod users;
pub mod video;

pub use assignments::AssignmentService;
pub use auth::AuthService;
pub use documents::DocumentService;
pub use plans::PlanService;
pub use reports::ReportService;
pub use stages::StageService;
pub use users::UserService;
pub use video::VideoService;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::fmt::Display;
use std::sync::Arc;
use tracing::error;

use crate::cache::{ObjectCache, user_cache_key};
use crate::middlewares::RequireJWT;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};

/// 从 app_data 取出共享组件（存储、缓存、外部服务客户端）
pub(crate) fn app_component<T: ?Sized + 'static>(
    request: &HttpRequest,
    name: &str,
) -> ActixResult<Arc<T>> {
    request
        .app_data::<web::Data<Arc<T>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| {
            error!("{} not found in app data", name);
            actix_web::error::ErrorInternalServerError(format!("{name} not configured"))
        })
}

/// 当前登录用户，缺失时返回 401 响应
pub(crate) fn current_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        ))
    })
}

/// 记录错误并返回 500
pub(crate) fn internal_error(code: ErrorCode, context: &str, err: impl Display) -> HttpResponse {
    error!("{}: {}", context, err);
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(code, format!("{context}: {err}")))
}

pub(crate) fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn not_found(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn forbidden(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn conflict(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(code, message))
}

/// 用户被修改、删除或注销后清除其缓存
pub(crate) async fn evict_cached_user(request: &HttpRequest, user_id: i64) {
    if let Some(cache) = request.app_data::<web::Data<Arc<dyn ObjectCache>>>() {
        cache.remove(&user_cache_key(user_id)).await;
    }
}
