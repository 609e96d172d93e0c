use super::entities::VideoRoom;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/video.ts")]
pub struct RoomResponse {
    pub room: VideoRoom,
}
