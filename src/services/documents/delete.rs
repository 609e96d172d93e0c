use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::DocumentService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{internal_error, not_found};

pub async fn delete_document(
    service: &DocumentService,
    document_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let blob_store = service.get_blob_store(request)?;

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

    if let Err(e) = blob_store.delete(&document.storage_key).await {
        return Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to delete document content",
            e,
        ));
    }

    match storage.delete_document(document_id).await {
        Ok(true) => {
            info!("Document {} deleted", document_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Document deleted successfully",
            )))
        }
        Ok(false) => Ok(not_found(ErrorCode::DocumentNotFound, "Document not found")),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Document deletion failed",
            e,
        )),
    }
}
