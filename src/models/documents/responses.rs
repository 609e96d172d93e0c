use super::entities::Document;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/document.ts")]
pub struct DocumentListResponse {
    pub items: Vec<Document>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/document.ts")]
pub struct SignedUrlResponse {
    pub url: String,
    /// 秒
    pub expires_in: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/document.ts")]
pub struct DocumentResponse {
    pub document: Document,
    pub url: String,
    pub expires_in: i64,
}
