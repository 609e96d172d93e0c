use super::entities::Stage;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/stage.ts")]
pub struct StageListResponse {
    pub items: Vec<Stage>,
}
