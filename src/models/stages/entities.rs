use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 招生阶段，属于某个计划，按 order 排序
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/stage.ts")]
pub struct Stage {
    pub id: i64,
    pub plan_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub order: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
