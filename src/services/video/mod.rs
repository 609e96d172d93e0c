pub mod rooms;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::integrations::VideoRoomProvider;
use crate::models::video::requests::CreateRoomRequest;

pub struct VideoService;

impl VideoService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub(crate) fn get_provider(
        &self,
        request: &HttpRequest,
    ) -> ActixResult<Arc<dyn VideoRoomProvider>> {
        super::app_component::<dyn VideoRoomProvider>(request, "VideoRoomProvider")
    }

    // 创建视频会议房间
    pub async fn create_room(
        &self,
        room_data: CreateRoomRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        rooms::create_room(self, room_data, request).await
    }
}
