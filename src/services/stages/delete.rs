use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::StageService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{internal_error, not_found};

pub async fn delete_stage(
    service: &StageService,
    stage_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_stage(stage_id).await {
        Ok(true) => {
            info!("Stage {} deleted with its assignments", stage_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Stage deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::StageNotFound, "Stage not found")),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Stage deletion failed",
            e,
        )),
    }
}
