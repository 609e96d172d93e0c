use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AssignmentService, due_date_within_stage};
use crate::models::users::entities::UserStatus;
use crate::models::{ApiResponse, ErrorCode, assignments::requests::CreateAssignmentRequest};
use crate::services::{bad_request, current_user, internal_error, not_found};
use crate::utils::validate::validate_required_text;

pub async fn create_assignment(
    service: &AssignmentService,
    mut assignment_data: CreateAssignmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    match validate_required_text("Title", &assignment_data.title, 200) {
        Ok(title) => assignment_data.title = title.to_string(),
        Err(msg) => return Ok(bad_request(ErrorCode::BadRequest, msg)),
    }

    let storage = service.get_storage(request)?;

    let stage = match storage.get_stage_by_id(assignment_data.stage_id).await {
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

    match storage.get_user_by_id(assignment_data.assignee_id).await {
        Ok(Some(assignee)) if assignee.status == UserStatus::Active => {}
        Ok(Some(_)) => {
            return Ok(bad_request(
                ErrorCode::UserInactive,
                "Cannot assign work to an inactive user",
            ));
        }
        Ok(None) => return Ok(not_found(ErrorCode::UserNotFound, "Assignee not found")),
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::InternalServerError,
                "Failed to get assignee",
                e,
            ));
        }
    }

    if let Some(due_date) = assignment_data.due_date
        && !due_date_within_stage(&stage, due_date)
    {
        return Ok(bad_request(
            ErrorCode::AssignmentDueDateInvalid,
            format!(
                "Due date must be within the stage range ({} to {})",
                stage.start_date, stage.end_date
            ),
        ));
    }

    match storage.create_assignment(assignment_data, user.id).await {
        Ok(assignment) => {
            info!(
                "Assignment {} created for user {} in stage {}",
                assignment.id, assignment.assignee_id, assignment.stage_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                assignment,
                "Assignment created successfully",
            )))
        }
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Assignment creation failed",
            e,
        )),
    }
}
