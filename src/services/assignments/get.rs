use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, can_view};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, forbidden, internal_error, not_found};

pub async fn get_assignment(
    service: &AssignmentService,
    assignment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(assignment)) if can_view(&user, &assignment) => Ok(HttpResponse::Ok().json(
            ApiResponse::success(assignment, "Assignment retrieved successfully"),
        )),
        Ok(Some(_)) => Ok(forbidden(
            ErrorCode::Forbidden,
            "You can only view your own assignments",
        )),
        Ok(None) => Ok(not_found(
            ErrorCode::AssignmentNotFound,
            "Assignment not found",
        )),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to get assignment",
            e,
        )),
    }
}
