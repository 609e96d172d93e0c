use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/video.ts")]
pub struct CreateRoomRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}
