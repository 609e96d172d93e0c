use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::DocumentService;
use crate::errors::{PortalError, Result};
use crate::models::documents::responses::SignedUrlResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{internal_error, not_found};
use crate::utils::jwt::JwtUtils;

/// 生成签名下载链接，返回 (url, 有效秒数)
pub(crate) fn signed_download_url(base_url: &str, document_id: i64) -> Result<(String, i64)> {
    let (token, expires_in) = JwtUtils::generate_download_token(document_id)
        .map_err(|e| PortalError::authentication(format!("Failed to sign download link: {e}")))?;
    let url = format!(
        "{}/api/documents/{}/download?token={}",
        base_url.trim_end_matches('/'),
        document_id,
        token
    );
    Ok((url, expires_in))
}

pub async fn get_document_url(
    service: &DocumentService,
    document_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_document_by_id(document_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::DocumentNotFound, "Document not found")),
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::InternalServerError,
                "Failed to get document",
                e,
            ));
        }
    }

    let base_url = &service.get_config().documents.public_base_url;
    match signed_download_url(base_url, document_id) {
        Ok((url, expires_in)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SignedUrlResponse { url, expires_in },
            "Download link generated",
        ))),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to generate download link",
            e,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_url_is_bound_to_document() {
        let (url, expires_in) = signed_download_url("http://portal.local/", 42).unwrap();
        assert!(url.starts_with("http://portal.local/api/documents/42/download?token="));
        assert!(expires_in > 0);

        let token = url.split("token=").nth(1).unwrap();
        assert_eq!(JwtUtils::verify_download_token(token).unwrap(), 42);
    }
}
