use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::PlanService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{internal_error, not_found};

// 阶段和任务在同一事务中级联删除，关联报告保留但解除关联
pub async fn delete_plan(
    service: &PlanService,
    plan_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_plan(plan_id).await {
        Ok(true) => {
            info!("Enrollment plan {} deleted", plan_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Plan deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::PlanNotFound, "Plan not found")),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Plan deletion failed",
            e,
        )),
    }
}
