use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/document.ts")]
pub struct DocumentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
}

// base64 上传
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../web/src/types/generated/document.ts")]
pub struct UploadDocumentRequest {
    pub file_name: String,
    pub file_type: String,
    /// base64，可带 `data:<mime>;base64,` 前缀
    pub content: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub token: String,
}

// 用于存储层
#[derive(Debug, Clone, Default)]
pub struct DocumentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub search: Option<String>,
}

impl From<DocumentListParams> for DocumentListQuery {
    fn from(params: DocumentListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            search: params.search,
        }
    }
}

// 新建文档记录（存储层）
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub file_name: String,
    pub file_type: String,
    pub file_size: i64,
    pub storage_key: String,
    pub description: Option<String>,
    pub uploaded_by: i64,
}
