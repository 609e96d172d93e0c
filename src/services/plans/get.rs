use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PlanService;
use crate::models::{ApiResponse, ErrorCode, plans::entities::PlanDetail};
use crate::services::{internal_error, not_found};

pub async fn get_plan(
    service: &PlanService,
    plan_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let plan = match storage.get_plan_by_id(plan_id).await {
        Ok(Some(plan)) => plan,
        Ok(None) => return Ok(not_found(ErrorCode::PlanNotFound, "Plan not found")),
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::InternalServerError,
                "Failed to get plan",
                e,
            ));
        }
    };

    match storage.list_stages_by_plan(plan_id).await {
        Ok(stages) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            PlanDetail { plan, stages },
            "Plan retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to get plan stages",
            e,
        )),
    }
}
