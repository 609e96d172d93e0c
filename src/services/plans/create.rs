use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::PlanService;
use crate::models::{ApiResponse, ErrorCode, plans::requests::CreatePlanRequest};
use crate::services::{bad_request, current_user, internal_error};
use crate::utils::validate::{validate_date_range, validate_required_text};

pub async fn create_plan(
    service: &PlanService,
    mut plan_data: CreatePlanRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    match validate_required_text("Plan name", &plan_data.name, 200) {
        Ok(name) => plan_data.name = name.to_string(),
        Err(msg) => return Ok(bad_request(ErrorCode::BadRequest, msg)),
    }

    if let Err(msg) = validate_date_range(plan_data.start_date, plan_data.end_date) {
        return Ok(bad_request(ErrorCode::PlanDateRangeInvalid, msg));
    }

    let storage = service.get_storage(request)?;

    match storage.create_plan(plan_data, user.id).await {
        Ok(plan) => {
            info!("Enrollment plan {} created by user {}", plan.id, user.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(plan, "Plan created successfully")))
        }
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Plan creation failed",
            e,
        )),
    }
}
