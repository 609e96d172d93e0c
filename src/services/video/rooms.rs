use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::VideoService;
use crate::models::users::entities::User;
use crate::models::video::{requests::CreateRoomRequest, responses::RoomResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;

/// 未指定名称时生成 `utc2-<用户ID>-<时间戳>`
fn room_name(requested: Option<&str>, user: &User) -> String {
    match requested.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => name.to_string(),
        None => format!("utc2-{}-{}", user.id, chrono::Utc::now().timestamp()),
    }
}

pub async fn create_room(
    service: &VideoService,
    room_data: CreateRoomRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let provider = service.get_provider(request)?;
    if !provider.is_configured() {
        return Ok(HttpResponse::ServiceUnavailable().json(ApiResponse::error_empty(
            ErrorCode::ServiceNotConfigured,
            "Video conferencing is not configured",
        )));
    }

    let name = room_name(room_data.name.as_deref(), &user);
    let description = room_data
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty());

    match provider.create_room(&name, description).await {
        Ok(room) => {
            info!("Video room {} created by user {}", room.room_id, user.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                RoomResponse { room },
                "Room created successfully",
            )))
        }
        Err(e) => {
            error!("Video room creation failed: {}", e);
            Ok(HttpResponse::BadGateway().json(ApiResponse::error_empty(
                ErrorCode::VideoServiceFailed,
                format!("Video room creation failed: {}", e.message()),
            )))
        }
    }
}
