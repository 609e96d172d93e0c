use super::entities::EnrollmentPlan;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/plan.ts")]
pub struct PlanListResponse {
    pub items: Vec<EnrollmentPlan>,
    pub pagination: PaginationInfo,
}
