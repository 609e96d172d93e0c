use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::auth::requests::UpdateProfileRequest;
use crate::models::users::requests::UpdateUserRequest;
use crate::models::users::responses::UserResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, current_user, evict_cached_user, internal_error, not_found};
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validate::{validate_password_simple, validate_required_text};

use super::AuthService;

pub async fn handle_update_profile(
    service: &AuthService,
    update_data: UpdateProfileRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    let full_name = match update_data.full_name.as_deref() {
        Some(name) => match validate_required_text("Full name", name, 100) {
            Ok(name) => Some(name.to_string()),
            Err(msg) => return Ok(bad_request(ErrorCode::BadRequest, msg)),
        },
        None => None,
    };

    // 修改密码需要先验证当前密码
    let hashed_password = if let Some(new_password) = update_data.new_password.as_deref() {
        let Some(current_password) = update_data.current_password.as_deref() else {
            return Ok(bad_request(
                ErrorCode::UserPasswordInvalid,
                "Current password is required to set a new password",
            ));
        };

        // 缓存中的用户不含密码哈希，这里重新读库
        let stored = match storage.get_user_by_id(current.id).await {
            Ok(Some(user)) => user,
            Ok(None) => return Ok(not_found(ErrorCode::UserNotFound, "User not found")),
            Err(e) => {
                return Ok(internal_error(
                    ErrorCode::UserUpdateFailed,
                    "Failed to load user",
                    e,
                ));
            }
        };

        if !verify_password(current_password, &stored.password_hash) {
            return Ok(bad_request(
                ErrorCode::UserPasswordInvalid,
                "Current password is incorrect",
            ));
        }

        if let Err(msg) = validate_password_simple(new_password) {
            return Ok(bad_request(ErrorCode::UserPasswordInvalid, msg));
        }

        match hash_password(new_password) {
            Ok(hash) => Some(hash),
            Err(e) => {
                return Ok(internal_error(
                    ErrorCode::InternalServerError,
                    "Password hashing failed",
                    e,
                ));
            }
        }
    } else {
        None
    };

    // 角色、状态和邮箱只能由管理员修改
    let storage_update = UpdateUserRequest {
        password: hashed_password,
        full_name,
        phone: update_data.phone,
        department: update_data.department,
        avatar_url: update_data.avatar_url,
        ..Default::default()
    };

    match storage.update_user(current.id, storage_update).await {
        Ok(Some(user)) => {
            evict_cached_user(request, user.id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse { user },
                "Profile updated successfully",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => Ok(internal_error(
            ErrorCode::UserUpdateFailed,
            "Profile update failed",
            e,
        )),
    }
}
