use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StageService, check_assignment_due_dates, check_stage_dates, check_stage_order};
use crate::models::{ApiResponse, ErrorCode, stages::requests::UpdateStageRequest};
use crate::services::{bad_request, conflict, internal_error, not_found};
use crate::utils::validate::validate_required_text;

pub async fn update_stage(
    service: &StageService,
    stage_id: i64,
    mut update_data: UpdateStageRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let existing = match storage.get_stage_by_id(stage_id).await {
        Ok(Some(stage)) => stage,
        Ok(None) => return Ok(not_found(ErrorCode::StageNotFound, "Stage not found")),
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::InternalServerError,
                "Failed to get stage",
                e,
            ));
        }
    };

    let plan = match storage.get_plan_by_id(existing.plan_id).await {
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
        match validate_required_text("Stage name", name, 200) {
            Ok(name) => update_data.name = Some(name.to_string()),
            Err(msg) => return Ok(bad_request(ErrorCode::BadRequest, msg)),
        }
    }

    // 与现有值合并后再校验
    let start = update_data.start_date.unwrap_or(existing.start_date);
    let end = update_data.end_date.unwrap_or(existing.end_date);
    if let Err(msg) = check_stage_dates(&plan, start, end) {
        return Ok(bad_request(ErrorCode::StageDateRangeInvalid, msg));
    }

    // 收缩范围时不能把已有任务的截止日期排除在外
    if start > existing.start_date || end < existing.end_date {
        let assignments = match storage.list_assignments_by_stage(stage_id).await {
            Ok(assignments) => assignments,
            Err(e) => {
                return Ok(internal_error(
                    ErrorCode::InternalServerError,
                    "Failed to get stage assignments",
                    e,
                ));
            }
        };
        if let Err(msg) = check_assignment_due_dates(&assignments, start, end) {
            return Ok(bad_request(ErrorCode::StageDateRangeInvalid, msg));
        }
    }

    if let Some(order) = update_data.order
        && order != existing.order
    {
        if let Err(msg) = check_stage_order(order) {
            return Ok(bad_request(ErrorCode::BadRequest, msg));
        }
        match storage
            .stage_order_exists(existing.plan_id, order, Some(stage_id))
            .await
        {
            Ok(true) => {
                return Ok(conflict(
                    ErrorCode::StageOrderConflict,
                    format!("Stage order {order} already exists in this plan"),
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
    }

    match storage.update_stage(stage_id, update_data).await {
        Ok(Some(stage)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            stage,
            "Stage updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::StageNotFound, "Stage not found")),
        Err(e) if e.is_unique_violation() => Ok(conflict(
            ErrorCode::StageOrderConflict,
            "Stage order already exists in this plan",
        )),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Stage update failed",
            e,
        )),
    }
}
