use serde::Deserialize;
use ts_rs::TS;

use super::entities::ReportStatus;
use crate::models::common::PaginationQuery;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/report.ts")]
pub struct ReportListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<ReportStatus>,
    pub plan_id: Option<i64>,
    pub author_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/report.ts")]
pub struct CreateReportRequest {
    pub title: String,
    pub content: String,
    pub plan_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/report.ts")]
pub struct ReviewReportRequest {
    pub status: ReportStatus,
    pub review_note: Option<String>,
}

// 基于招生计划生成 AI 报告
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/report.ts")]
pub struct GeneratePlanReportRequest {
    /// 为空时使用全部计划
    pub plan_ids: Option<Vec<i64>>,
    pub instructions: Option<String>,
}

// 基于当前用户的任务起草报告
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/report.ts")]
pub struct DraftReportRequest {
    pub plan_id: Option<i64>,
    pub instructions: Option<String>,
}

// 用于存储层
#[derive(Debug, Clone, Default)]
pub struct ReportListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub status: Option<ReportStatus>,
    pub plan_id: Option<i64>,
    pub author_id: Option<i64>,
}

impl From<ReportListParams> for ReportListQuery {
    fn from(params: ReportListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            status: params.status,
            plan_id: params.plan_id,
            author_id: params.author_id,
        }
    }
}
