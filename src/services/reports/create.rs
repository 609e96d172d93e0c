use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ReportService;
use crate::models::{ApiResponse, ErrorCode, reports::requests::CreateReportRequest};
use crate::services::{bad_request, current_user, internal_error, not_found};
use crate::utils::validate::validate_required_text;

// 报告正文（Markdown）上限
const MAX_CONTENT_CHARS: usize = 100_000;

pub async fn create_report(
    service: &ReportService,
    mut report_data: CreateReportRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    match validate_required_text("Title", &report_data.title, 200) {
        Ok(title) => report_data.title = title.to_string(),
        Err(msg) => return Ok(bad_request(ErrorCode::BadRequest, msg)),
    }
    if let Err(msg) = validate_required_text("Content", &report_data.content, MAX_CONTENT_CHARS) {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    let storage = service.get_storage(request)?;

    if let Some(plan_id) = report_data.plan_id {
        match storage.get_plan_by_id(plan_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Ok(not_found(ErrorCode::PlanNotFound, "Plan not found")),
            Err(e) => {
                return Ok(internal_error(
                    ErrorCode::InternalServerError,
                    "Failed to get plan",
                    e,
                ));
            }
        }
    }

    match storage.create_report(report_data, user.id).await {
        Ok(report) => {
            info!("Report {} submitted by user {}", report.id, user.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                report,
                "Report submitted successfully",
            )))
        }
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Report submission failed",
            e,
        )),
    }
}
