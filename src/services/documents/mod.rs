pub mod delete;
pub mod download;
pub mod get;
pub mod list;
pub mod upload;
pub mod url;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::documents::requests::{DocumentListParams, UploadDocumentRequest};
use crate::storage::{BlobStore, Storage};

pub struct DocumentService {
    storage: Option<Arc<dyn Storage>>,
}

impl DocumentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::app_component::<dyn Storage>(request, "Storage"),
        }
    }

    pub(crate) fn get_blob_store(&self, request: &HttpRequest) -> ActixResult<Arc<dyn BlobStore>> {
        super::app_component::<dyn BlobStore>(request, "BlobStore")
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 文档列表
    pub async fn list_documents(
        &self,
        query: DocumentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_documents(self, query, request).await
    }

    // 上传文档（base64）
    pub async fn upload_document(
        &self,
        upload_data: UploadDocumentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        upload::upload_document(self, upload_data, request).await
    }

    // 文档详情（含签名链接）
    pub async fn get_document(
        &self,
        document_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_document(self, document_id, request).await
    }

    // 重新签发下载链接
    pub async fn get_document_url(
        &self,
        document_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        url::get_document_url(self, document_id, request).await
    }

    // 通过签名链接下载
    pub async fn download_document(
        &self,
        document_id: i64,
        token: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        download::download_document(self, document_id, token, request).await
    }

    // 删除文档（先删 blob，再删记录）
    pub async fn delete_document(
        &self,
        document_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_document(self, document_id, request).await
    }
}
