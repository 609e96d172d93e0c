use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PlanService;
use crate::models::{ApiResponse, ErrorCode, plans::requests::UpdatePlanRequest};
use crate::services::{bad_request, internal_error, not_found};
use crate::utils::validate::{range_within, validate_date_range, validate_required_text};

pub async fn update_plan(
    service: &PlanService,
    plan_id: i64,
    mut update_data: UpdatePlanRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let existing = match storage.get_plan_by_id(plan_id).await {
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

    if let Some(ref name) = update_data.name {
        match validate_required_text("Plan name", name, 200) {
            Ok(name) => update_data.name = Some(name.to_string()),
            Err(msg) => return Ok(bad_request(ErrorCode::BadRequest, msg)),
        }
    }

    // 用合并后的日期校验
    let start = update_data.start_date.unwrap_or(existing.start_date);
    let end = update_data.end_date.unwrap_or(existing.end_date);
    if let Err(msg) = validate_date_range(start, end) {
        return Ok(bad_request(ErrorCode::PlanDateRangeInvalid, msg));
    }

    // 新的时间范围必须覆盖所有已有阶段
    let stages = match storage.list_stages_by_plan(plan_id).await {
        Ok(stages) => stages,
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::InternalServerError,
                "Failed to get plan stages",
                e,
            ));
        }
    };
    if let Some(stage) = stages
        .iter()
        .find(|stage| !range_within((stage.start_date, stage.end_date), (start, end)))
    {
        return Ok(bad_request(
            ErrorCode::PlanDateRangeInvalid,
            format!(
                "Plan range must contain stage '{}' ({} to {})",
                stage.name, stage.start_date, stage.end_date
            ),
        ));
    }

    match storage.update_plan(plan_id, update_data).await {
        Ok(Some(plan)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            plan,
            "Plan updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::PlanNotFound, "Plan not found")),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Plan update failed",
            e,
        )),
    }
}
