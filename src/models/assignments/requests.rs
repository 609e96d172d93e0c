use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

use super::entities::AssignmentStatus;
use crate::models::common::PaginationQuery;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/assignment.ts")]
pub struct AssignmentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub stage_id: Option<i64>,
    pub status: Option<AssignmentStatus>,
    pub assignee_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/assignment.ts")]
pub struct CreateAssignmentRequest {
    pub stage_id: i64,
    pub assignee_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<AssignmentStatus>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/assignment.ts")]
pub struct UpdateAssignmentRequest {
    pub assignee_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<AssignmentStatus>,
    pub due_date: Option<NaiveDate>,
}

impl UpdateAssignmentRequest {
    /// 除 status 外是否还修改了其他字段
    pub fn touches_more_than_status(&self) -> bool {
        self.assignee_id.is_some()
            || self.title.is_some()
            || self.description.is_some()
            || self.due_date.is_some()
    }
}

// 用于存储层
#[derive(Debug, Clone, Default)]
pub struct AssignmentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub stage_id: Option<i64>,
    pub status: Option<AssignmentStatus>,
    pub assignee_id: Option<i64>,
}

impl From<AssignmentListParams> for AssignmentListQuery {
    fn from(params: AssignmentListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            stage_id: params.stage_id,
            status: params.status,
            assignee_id: params.assignee_id,
        }
    }
}
