use super::entities::Report;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/report.ts")]
pub struct ReportListResponse {
    pub items: Vec<Report>,
    pub pagination: PaginationInfo,
}

// AI 生成的 Markdown 报告
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/report.ts")]
pub struct GeneratedReportResponse {
    pub report: String,
}
