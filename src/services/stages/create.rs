use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{StageService, check_stage_dates, check_stage_order};
use crate::models::{ApiResponse, ErrorCode, stages::requests::CreateStageRequest};
use crate::services::{bad_request, conflict, internal_error, not_found};
use crate::utils::validate::validate_required_text;

pub async fn create_stage(
    service: &StageService,
    plan_id: i64,
    mut stage_data: CreateStageRequest,
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

    match validate_required_text("Stage name", &stage_data.name, 200) {
        Ok(name) => stage_data.name = name.to_string(),
        Err(msg) => return Ok(bad_request(ErrorCode::BadRequest, msg)),
    }

    if let Err(msg) = check_stage_order(stage_data.order) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    if let Err(msg) = check_stage_dates(&plan, stage_data.start_date, stage_data.end_date) {
        return Ok(bad_request(ErrorCode::StageDateRangeInvalid, msg));
    }

    match storage
        .stage_order_exists(plan_id, stage_data.order, None)
        .await
    {
        Ok(true) => {
            return Ok(conflict(
                ErrorCode::StageOrderConflict,
                format!("Stage order {} already exists in this plan", stage_data.order),
            ));
        }
        Ok(false) => {}
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::InternalServerError,
                "Failed to check stage order",
                e,
            ));
        }
    }

    match storage.create_stage(plan_id, stage_data).await {
        Ok(stage) => {
            info!("Stage {} created in plan {}", stage.id, plan_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(stage, "Stage created successfully")))
        }
        Err(e) if e.is_unique_violation() => Ok(conflict(
            ErrorCode::StageOrderConflict,
            "Stage order already exists in this plan",
        )),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Stage creation failed",
            e,
        )),
    }
}
