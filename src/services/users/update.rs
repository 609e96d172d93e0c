use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{requests::UpdateUserRequest, responses::UserResponse},
};
use crate::services::{bad_request, conflict, evict_cached_user, internal_error, not_found};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password_simple, validate_required_text};

pub async fn update_user(
    service: &UserService,
    user_id: i64,
    mut update_data: UpdateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Some(ref email) = update_data.email {
        if let Err(msg) = validate_email(email) {
            return Ok(bad_request(ErrorCode::UserEmailInvalid, msg));
        }
        // 邮箱不能与其他用户重复
        match storage.get_user_by_email(email).await {
            Ok(Some(existing)) if existing.id != user_id => {
                return Ok(conflict(
                    ErrorCode::UserAlreadyExists,
                    "Email already exists",
                ));
            }
            Ok(_) => {}
            Err(e) => {
                return Ok(internal_error(
                    ErrorCode::UserUpdateFailed,
                    "User update failed",
                    e,
                ));
            }
        }
    }

    if let Some(ref name) = update_data.full_name {
        match validate_required_text("Full name", name, 100) {
            Ok(name) => update_data.full_name = Some(name.to_string()),
            Err(msg) => return Ok(bad_request(ErrorCode::BadRequest, msg)),
        }
    }

    if let Some(ref password) = update_data.password {
        if let Err(msg) = validate_password_simple(password) {
            return Ok(bad_request(ErrorCode::UserPasswordInvalid, msg));
        }
        match hash_password(password) {
            Ok(hash) => update_data.password = Some(hash),
            Err(e) => {
                return Ok(internal_error(
                    ErrorCode::InternalServerError,
                    "Password hashing failed",
                    e,
                ));
            }
        }
    }

    match storage.update_user(user_id, update_data).await {
        Ok(Some(user)) => {
            evict_cached_user(request, user_id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse { user },
                "User updated successfully",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) if e.is_unique_violation() => Ok(conflict(
            ErrorCode::UserAlreadyExists,
            "Email already exists",
        )),
        Err(e) => Ok(internal_error(
            ErrorCode::UserUpdateFailed,
            "User update failed",
            e,
        )),
    }
}
