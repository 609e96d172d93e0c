use actix_web::http::header::{
    CONTENT_TYPE, Charset, ContentDisposition, DispositionParam, DispositionType, ExtendedValue,
};
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::DocumentService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{forbidden, internal_error, not_found};
use crate::utils::jwt::JwtUtils;

// ASCII 文件名作为兜底，完整文件名通过 filename* (UTF-8) 给出
fn attachment_disposition(file_name: &str) -> ContentDisposition {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();

    ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![
            DispositionParam::Filename(fallback),
            DispositionParam::FilenameExt(ExtendedValue {
                charset: Charset::Ext("UTF-8".to_string()),
                language_tag: None,
                value: file_name.as_bytes().to_vec(),
            }),
        ],
    }
}

pub async fn download_document(
    service: &DocumentService,
    document_id: i64,
    token: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 签名本身就是凭证，且只对签发时的文档有效
    match JwtUtils::verify_download_token(&token) {
        Ok(signed_id) if signed_id == document_id => {}
        Ok(signed_id) => {
            info!(
                "Download link for document {} used on document {}",
                signed_id, document_id
            );
            return Ok(forbidden(
                ErrorCode::DocumentLinkInvalid,
                "Download link is not valid for this document",
            ));
        }
        Err(e) => {
            info!("Download link rejected: {}", e);
            return Ok(forbidden(
                ErrorCode::DocumentLinkInvalid,
                "Download link is invalid or expired",
            ));
        }
    }

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

    let bytes = match blob_store.get(&document.storage_key).await {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            error!(
                "Blob {} missing for document {}",
                document.storage_key, document.id
            );
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::DocumentNotFound,
                "Document content not found",
            )));
        }
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::InternalServerError,
                "Failed to read document",
                e,
            ));
        }
    };

    Ok(HttpResponse::Ok()
        .insert_header((CONTENT_TYPE, document.file_type.as_str()))
        .insert_header(attachment_disposition(&document.file_name))
        .body(bytes))
}
