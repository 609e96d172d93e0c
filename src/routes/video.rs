use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::method_not_allowed;
use crate::middlewares;
use crate::models::video::requests::CreateRoomRequest;
use crate::services::VideoService;

static VIDEO_SERVICE: Lazy<VideoService> = Lazy::new(VideoService::new_lazy);

pub async fn create_room(
    req: HttpRequest,
    room_data: web::Json<CreateRoomRequest>,
) -> ActixResult<HttpResponse> {
    VIDEO_SERVICE.create_room(room_data.into_inner(), &req).await
}

pub fn configure_video_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/video")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/rooms")
                    .route(web::post().to(create_room))
                    .default_service(web::to(method_not_allowed)),
            ),
    );
}
