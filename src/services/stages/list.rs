use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StageService;
use crate::models::{ApiResponse, ErrorCode, stages::responses::StageListResponse};
use crate::services::{internal_error, not_found};

pub async fn list_stages(
    service: &StageService,
    plan_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_plan_by_id(plan_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::PlanNotFound, "Plan not found")),
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::InternalServerError,
                "Failed to get plan",
                e,
            ));
        }
    }

    match storage.list_stages_by_plan(plan_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            StageListResponse { items },
            "Stage list retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to get stage list",
            e,
        )),
    }
}
