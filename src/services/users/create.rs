use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{requests::CreateUserRequest, responses::UserResponse},
};
use crate::services::{bad_request, conflict, internal_error};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password_simple, validate_required_text};

pub async fn create_user(
    service: &UserService,
    mut user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 验证邮箱
    if let Err(msg) = validate_email(&user_data.email) {
        return Ok(bad_request(ErrorCode::UserEmailInvalid, msg));
    }

    match validate_required_text("Full name", &user_data.full_name, 100) {
        Ok(name) => user_data.full_name = name.to_string(),
        Err(msg) => return Ok(bad_request(ErrorCode::BadRequest, msg)),
    }

    // 密码策略
    if let Err(msg) = validate_password_simple(&user_data.password) {
        return Ok(bad_request(ErrorCode::UserPasswordInvalid, msg));
    }

    let storage = service.get_storage(request)?;

    match storage.get_user_by_email(&user_data.email).await {
        Ok(Some(_)) => {
            return Ok(conflict(
                ErrorCode::UserAlreadyExists,
                "Email already exists",
            ));
        }
        Ok(None) => {}
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::UserCreationFailed,
                "User creation failed",
                e,
            ));
        }
    }

    user_data.password = match hash_password(&user_data.password) {
        Ok(hash) => hash,
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::InternalServerError,
                "Password hashing failed",
                e,
            ));
        }
    };

    match storage.create_user(user_data).await {
        Ok(user) => {
            info!("User {} created with role {}", user.email, user.role);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(UserResponse { user }, "User created successfully")))
        }
        // 并发创建时由唯一索引兜底
        Err(e) if e.is_unique_violation() => Ok(conflict(
            ErrorCode::UserAlreadyExists,
            "Email already exists",
        )),
        Err(e) => Ok(internal_error(
            ErrorCode::UserCreationFailed,
            "User creation failed",
            e,
        )),
    }
}
