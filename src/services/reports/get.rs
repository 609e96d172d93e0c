use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ReportService, can_view};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, forbidden, internal_error, not_found};

pub async fn get_report(
    service: &ReportService,
    report_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    match storage.get_report_by_id(report_id).await {
        Ok(Some(report)) if can_view(&user, &report) => Ok(HttpResponse::Ok().json(
            ApiResponse::success(report, "Report retrieved successfully"),
        )),
        Ok(Some(_)) => Ok(forbidden(
            ErrorCode::Forbidden,
            "You can only view your own reports",
        )),
        Ok(None) => Ok(not_found(ErrorCode::ReportNotFound, "Report not found")),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to get report",
            e,
        )),
    }
}
