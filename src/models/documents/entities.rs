use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 文档元数据，文件内容保存在 blob 存储
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/document.ts")]
pub struct Document {
    pub id: i64,
    pub file_name: String,
    pub file_type: String,
    pub file_size: i64,
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub storage_key: String,
    pub description: Option<String>,
    pub uploaded_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
