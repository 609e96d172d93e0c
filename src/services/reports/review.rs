use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::info;

use super::ReportService;
use crate::models::reports::entities::ReportStatus;
use crate::models::{ApiResponse, ErrorCode, reports::requests::ReviewReportRequest};
use crate::services::{current_user, internal_error, not_found};
use crate::storage::ReviewOutcome;

/// 审阅状态流转：submitted/rejected 可以被审阅为 reviewed 或 rejected，reviewed 为终态
fn check_review_transition(
    current: ReportStatus,
    target: ReportStatus,
) -> Result<(), (StatusCode, ErrorCode, &'static str)> {
    if target == ReportStatus::Submitted {
        return Err((
            StatusCode::BAD_REQUEST,
            ErrorCode::ReportStatusInvalid,
            "Review status must be 'reviewed' or 'rejected'",
        ));
    }
    if current == ReportStatus::Reviewed {
        return Err((
            StatusCode::CONFLICT,
            ErrorCode::ReportAlreadyReviewed,
            "Report has already been reviewed",
        ));
    }
    Ok(())
}

pub async fn review_report(
    service: &ReportService,
    report_id: i64,
    review_data: ReviewReportRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let reviewer = match current_user(request) {
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

    if let Err((status, code, message)) = check_review_transition(report.status, review_data.status)
    {
        return Ok(HttpResponse::build(status).json(ApiResponse::error_empty(code, message)));
    }

    let note = review_data
        .review_note
        .map(|note| note.trim().to_string())
        .filter(|note| !note.is_empty());

    match storage
        .review_report(report_id, review_data.status, note, reviewer.id)
        .await
    {
        Ok(ReviewOutcome::Reviewed(report)) => {
            info!(
                "Report {} marked {} by user {}",
                report.id, report.status, reviewer.id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                report,
                "Report reviewed successfully",
            )))
        }
        // 并发审阅中落后的一方
        Ok(ReviewOutcome::AlreadyReviewed) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(
                ErrorCode::ReportAlreadyReviewed,
                "Report has already been reviewed",
            ),
        )),
        Ok(ReviewOutcome::NotFound) => {
            Ok(not_found(ErrorCode::ReportNotFound, "Report not found"))
        }
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Report review failed",
            e,
        )),
    }
}
