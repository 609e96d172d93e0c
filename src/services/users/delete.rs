use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, conflict, evict_cached_user, internal_error, not_found};

pub async fn delete_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 禁止删除当前登录的账号
    if RequireJWT::extract_user_id(request) == Some(user_id) {
        return Ok(bad_request(
            ErrorCode::CanNotDeleteCurrentUser,
            "Cannot delete current user",
        ));
    }

    let storage = service.get_storage(request)?;

    match storage.delete_user(user_id).await {
        Ok(true) => {
            evict_cached_user(request, user_id).await;
            info!("User {} deleted", user_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("User deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        // 仍被计划、任务或文档引用
        Err(e) if e.is_foreign_key_violation() => Ok(conflict(
            ErrorCode::UserDeleteFailed,
            "User is still referenced by plans, assignments, reports or documents",
        )),
        Err(e) => Ok(internal_error(
            ErrorCode::UserDeleteFailed,
            "User deletion failed",
            e,
        )),
    }
}
