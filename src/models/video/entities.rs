use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 视频会议房间
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/video.ts")]
pub struct VideoRoom {
    pub room_id: String,
    pub name: String,
    pub enabled: bool,
}
