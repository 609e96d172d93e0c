use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ReportService;
use crate::models::reports::entities::{Report, ReportStatus};
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, forbidden, internal_error, not_found};

// 管理员可删除任意报告；作者只能删除尚未审阅的报告
fn can_delete(user: &User, report: &Report) -> bool {
    user.is_admin() || (report.author_id == user.id && report.status == ReportStatus::Submitted)
}

pub async fn delete_report(
    service: &ReportService,
    report_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    let report = match storage.get_report_by_id(report_id).await {
        Ok(Some(report)) => report,
        Ok(None) => return Ok(not_found(ErrorCode::ReportNotFound, "Report not found")),
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::InternalServerError,
                "Failed to get report",
                e,
            ));
        }
    };

    if !can_delete(&user, &report) {
        return Ok(forbidden(
            ErrorCode::Forbidden,
            "Only the author can delete a report before it is reviewed",
        ));
    }

    match storage.delete_report(report_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Report deleted successfully",
        ))),
        Ok(false) => Ok(not_found(ErrorCode::ReportNotFound, "Report not found")),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Report deletion failed",
            e,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{UserProfile, UserRole, UserStatus};

    fn user(id: i64, role: UserRole) -> User {
        User {
            id,
            email: format!("u{id}@utc2.edu.vn"),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            profile: UserProfile::default(),
            last_login: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn report(author_id: i64, status: ReportStatus) -> Report {
        Report {
            id: 1,
            author_id,
            plan_id: None,
            title: "Báo cáo tuần".to_string(),
            content: "# Nội dung".to_string(),
            status,
            review_note: None,
            reviewed_by: None,
            reviewed_at: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_author_deletes_only_while_submitted() {
        let author = user(5, UserRole::Teacher);
        assert!(can_delete(&author, &report(5, ReportStatus::Submitted)));
        assert!(!can_delete(&author, &report(5, ReportStatus::Reviewed)));
        assert!(!can_delete(&author, &report(5, ReportStatus::Rejected)));
        assert!(!can_delete(&author, &report(6, ReportStatus::Submitted)));
    }

    #[test]
    fn test_admin_deletes_any_report() {
        let admin = user(1, UserRole::TruongBan);
        assert!(can_delete(&admin, &report(5, ReportStatus::Reviewed)));
    }
}
