use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StageService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{internal_error, not_found};

pub async fn get_stage(
    service: &StageService,
    stage_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_stage_by_id(stage_id).await {
        Ok(Some(stage)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            stage,
            "Stage retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::StageNotFound, "Stage not found")),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to get stage",
            e,
        )),
    }
}
