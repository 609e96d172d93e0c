use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header::HeaderValue};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::Path;
use tracing::{error, info, warn};

use super::DocumentService;
use super::url::signed_download_url;
use crate::errors::{PortalError, Result};
use crate::models::documents::requests::{NewDocument, UploadDocumentRequest};
use crate::models::documents::responses::DocumentResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, current_user, internal_error};
use crate::storage::blob::generate_storage_key;
use crate::utils::content_matches_extension;

const DEFAULT_MIME: &str = "application/octet-stream";

/// 去掉可选的 `data:<mime>;base64,` 前缀和空白后解码
pub(crate) fn decode_content(content: &str) -> Result<Vec<u8>> {
    let payload = match content.split_once(',') {
        Some((prefix, rest)) if prefix.starts_with("data:") => {
            if !prefix.ends_with(";base64") {
                return Err(PortalError::validation("Data URL must be base64 encoded"));
            }
            rest
        }
        _ => content,
    };
    let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(STANDARD.decode(cleaned)?)
}

/// 只保留文件名本身，去掉客户端可能带上的路径
pub(crate) fn base_file_name(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name).trim()
}

/// 小写扩展名，包含点号
pub(crate) fn file_extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
}

// base64 解码后的大致长度（含 data URL 前缀），用于解码前的快速拒绝
fn estimated_decoded_len(content: &str) -> usize {
    content.len() / 4 * 3
}

pub async fn upload_document(
    service: &DocumentService,
    upload_data: UploadDocumentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let config = &service.get_config().documents;

    let file_name = base_file_name(&upload_data.file_name).to_string();
    if file_name.is_empty() || file_name.chars().count() > 255 {
        return Ok(bad_request(
            ErrorCode::BadRequest,
            "File name must be between 1 and 255 characters",
        ));
    }

    let Some(extension) = file_extension(&file_name) else {
        return Ok(bad_request(
            ErrorCode::DocumentTypeNotAllowed,
            "File name must have an extension",
        ));
    };
    if !config
        .allowed_types
        .iter()
        .any(|t| t.eq_ignore_ascii_case(&extension))
    {
        return Ok(bad_request(
            ErrorCode::DocumentTypeNotAllowed,
            format!("File type {extension} is not allowed"),
        ));
    }

    // 下载时原样作为 Content-Type 返回
    let file_type = match upload_data.file_type.trim() {
        "" => DEFAULT_MIME.to_string(),
        mime if HeaderValue::from_str(mime).is_ok() => mime.to_string(),
        _ => {
            return Ok(bad_request(
                ErrorCode::DocumentTypeNotAllowed,
                "Invalid file type",
            ));
        }
    };

    if estimated_decoded_len(&upload_data.content) > config.max_size + 64 {
        return Ok(bad_request(
            ErrorCode::DocumentSizeExceeded,
            "File size exceeds the limit",
        ));
    }

    let bytes = match decode_content(&upload_data.content) {
        Ok(bytes) => bytes,
        Err(e) => return Ok(bad_request(ErrorCode::DocumentContentInvalid, e.message())),
    };
    if bytes.is_empty() {
        return Ok(bad_request(ErrorCode::DocumentContentInvalid, "File is empty"));
    }
    if bytes.len() > config.max_size {
        return Ok(bad_request(
            ErrorCode::DocumentSizeExceeded,
            "File size exceeds the limit",
        ));
    }
    if !content_matches_extension(&bytes, &extension) {
        return Ok(bad_request(
            ErrorCode::DocumentContentInvalid,
            "File content does not match its extension",
        ));
    }

    let storage = service.get_storage(request)?;
    let blob_store = service.get_blob_store(request)?;

    let storage_key = generate_storage_key(&extension);
    if let Err(e) = blob_store.put(&storage_key, &bytes).await {
        return Ok(internal_error(
            ErrorCode::DocumentUploadFailed,
            "Failed to store document",
            e,
        ));
    }

    let new_document = NewDocument {
        file_name,
        file_type,
        file_size: bytes.len() as i64,
        storage_key: storage_key.clone(),
        description: upload_data
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        uploaded_by: user.id,
    };

    let document = match storage.create_document(new_document).await {
        Ok(document) => document,
        Err(e) => {
            // 记录写入失败时回收已写入的 blob
            if let Err(cleanup) = blob_store.delete(&storage_key).await {
                warn!("Failed to clean up blob {}: {}", storage_key, cleanup);
            }
            error!("Failed to save document metadata: {}", e);
            return Ok(internal_error(
                ErrorCode::DocumentUploadFailed,
                "Failed to save document",
                e,
            ));
        }
    };

    info!(
        "Document {} ({} bytes) uploaded by user {}",
        document.id, document.file_size, user.id
    );

    match signed_download_url(&config.public_base_url, document.id) {
        Ok((url, expires_in)) => Ok(HttpResponse::Created().json(ApiResponse::success(
            DocumentResponse {
                document,
                url,
                expires_in,
            },
            "Document uploaded successfully",
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
    fn test_decode_plain_and_data_url() {
        assert_eq!(decode_content("JVBERi0xLjQ=").unwrap(), b"%PDF-1.4");
        assert_eq!(
            decode_content("data:application/pdf;base64,JVBERi0x\nLjQ=").unwrap(),
            b"%PDF-1.4"
        );
    }

    #[test]
    fn test_decode_rejects_invalid_input() {
        let err = decode_content("not base64!!").unwrap_err();
        assert_eq!(err.code(), "E007");
        assert!(decode_content("data:text/plain,hello").is_err());
    }

    #[test]
    fn test_file_name_helpers() {
        assert_eq!(base_file_name("C:\\Users\\gv\\ke-hoach.PDF"), "ke-hoach.PDF");
        assert_eq!(base_file_name("../../etc/passwd"), "passwd");
        assert_eq!(file_extension("ke-hoach.PDF").as_deref(), Some(".pdf"));
        assert_eq!(file_extension("README"), None);
    }

    #[test]
    fn test_estimated_len() {
        assert_eq!(estimated_decoded_len("JVBERi0xLjQ="), 9);
    }
}
