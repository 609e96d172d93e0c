use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::DocumentService;
use super::url::signed_download_url;
use crate::models::documents::responses::DocumentResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{internal_error, not_found};

pub async fn get_document(
    service: &DocumentService,
    document_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let document = match storage.get_document_by_id(document_id).await {
        Ok(Some(document)) => document,
        Ok(None) => return Ok(not_found(ErrorCode::DocumentNotFound, "Document not found")),
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::InternalServerError,
                "Failed to get document",
                e,
            ));
        }
    };

    let base_url = &service.get_config().documents.public_base_url;
    match signed_download_url(base_url, document.id) {
        Ok((url, expires_in)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            DocumentResponse {
                document,
                url,
                expires_in,
            },
            "Document retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to generate download link",
            e,
        )),
    }
}
