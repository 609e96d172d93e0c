use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};

use super::{AssignmentService, due_date_within_stage};
use crate::models::assignments::entities::Assignment;
use crate::models::users::entities::UserStatus;
use crate::models::{ApiResponse, ErrorCode, assignments::requests::UpdateAssignmentRequest};
use crate::services::{bad_request, current_user, internal_error, not_found};
use crate::utils::validate::validate_required_text;

/// 被分配者（非管理员）更新任务时的限制：只能改自己任务的状态，且不能取消
fn check_assignee_update(
    user_id: i64,
    assignment: &Assignment,
    update: &UpdateAssignmentRequest,
) -> Result<(), (StatusCode, ErrorCode, &'static str)> {
    if assignment.assignee_id != user_id {
        return Err((
            StatusCode::FORBIDDEN,
            ErrorCode::Forbidden,
            "You can only update your own assignments",
        ));
    }
    if update.touches_more_than_status() {
        return Err((
            StatusCode::FORBIDDEN,
            ErrorCode::Forbidden,
            "Only the status of an assignment can be updated",
        ));
    }
    match update.status {
        None => Err((
            StatusCode::BAD_REQUEST,
            ErrorCode::AssignmentStatusInvalid,
            "Status is required",
        )),
        Some(status) if !status.assignee_may_set() => Err((
            StatusCode::FORBIDDEN,
            ErrorCode::AssignmentStatusInvalid,
            "Only the committee head can cancel an assignment",
        )),
        Some(_) => Ok(()),
    }
}

pub async fn update_assignment(
    service: &AssignmentService,
    assignment_id: i64,
    mut update_data: UpdateAssignmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    let existing = match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(assignment)) => assignment,
        Ok(None) => {
            return Ok(not_found(
                ErrorCode::AssignmentNotFound,
                "Assignment not found",
            ));
        }
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::InternalServerError,
                "Failed to get assignment",
                e,
            ));
        }
    };

    if !user.is_admin() {
        if let Err((status, code, message)) =
            check_assignee_update(user.id, &existing, &update_data)
        {
            return Ok(HttpResponse::build(status).json(ApiResponse::error_empty(code, message)));
        }
    } else {
        if let Some(ref title) = update_data.title {
            match validate_required_text("Title", title, 200) {
                Ok(title) => update_data.title = Some(title.to_string()),
                Err(msg) => return Ok(bad_request(ErrorCode::BadRequest, msg)),
            }
        }

        if let Some(assignee_id) = update_data.assignee_id
            && assignee_id != existing.assignee_id
        {
            match storage.get_user_by_id(assignee_id).await {
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
        }

        if let Some(due_date) = update_data.due_date {
            let stage = match storage.get_stage_by_id(existing.stage_id).await {
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
            if !due_date_within_stage(&stage, due_date) {
                return Ok(bad_request(
                    ErrorCode::AssignmentDueDateInvalid,
                    format!(
                        "Due date must be within the stage range ({} to {})",
                        stage.start_date, stage.end_date
                    ),
                ));
            }
        }
    }

    match storage.update_assignment(assignment_id, update_data).await {
        Ok(Some(assignment)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            assignment,
            "Assignment updated successfully",
        ))),
        Ok(None) => Ok(not_found(
            ErrorCode::AssignmentNotFound,
            "Assignment not found",
        )),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Assignment update failed",
            e,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::entities::AssignmentStatus;

    fn assignment(assignee_id: i64) -> Assignment {
        Assignment {
            id: 1,
            stage_id: 1,
            assignee_id,
            title: "Gọi điện tư vấn".to_string(),
            description: None,
            status: AssignmentStatus::Pending,
            due_date: None,
            created_by: 1,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn status_only(status: AssignmentStatus) -> UpdateAssignmentRequest {
        UpdateAssignmentRequest {
            status: Some(status),
            ..Default::default()
        }
    }

    #[test]
    fn test_assignee_can_progress_own_assignment() {
        assert!(
            check_assignee_update(7, &assignment(7), &status_only(AssignmentStatus::Completed))
                .is_ok()
        );
    }

    #[test]
    fn test_assignee_cannot_cancel() {
        let (status, code, _) =
            check_assignee_update(7, &assignment(7), &status_only(AssignmentStatus::Cancelled))
                .unwrap_err();
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(code, ErrorCode::AssignmentStatusInvalid);
    }

    #[test]
    fn test_other_fields_are_locked() {
        let update = UpdateAssignmentRequest {
            status: Some(AssignmentStatus::InProgress),
            title: Some("Đổi tên".to_string()),
            ..Default::default()
        };
        let (status, _, _) = check_assignee_update(7, &assignment(7), &update).unwrap_err();
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_not_owner_and_missing_status() {
        let (status, code, _) =
            check_assignee_update(8, &assignment(7), &status_only(AssignmentStatus::Completed))
                .unwrap_err();
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(code, ErrorCode::Forbidden);

        let (status, _, _) =
            check_assignee_update(7, &assignment(7), &UpdateAssignmentRequest::default())
                .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
