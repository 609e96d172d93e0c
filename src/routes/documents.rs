use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::method_not_allowed;
use crate::middlewares;
use crate::models::documents::requests::{
    DocumentListParams, DownloadQuery, UploadDocumentRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::DocumentService;
use crate::utils::SafeIDI64;

// 懒加载的全局 DocumentService 实例
static DOCUMENT_SERVICE: Lazy<DocumentService> = Lazy::new(DocumentService::new_lazy);

pub async fn list_documents(
    req: HttpRequest,
    query: web::Query<DocumentListParams>,
) -> ActixResult<HttpResponse> {
    DOCUMENT_SERVICE.list_documents(query.into_inner(), &req).await
}

pub async fn upload_document(
    req: HttpRequest,
    upload_data: web::Json<UploadDocumentRequest>,
) -> ActixResult<HttpResponse> {
    DOCUMENT_SERVICE
        .upload_document(upload_data.into_inner(), &req)
        .await
}

pub async fn get_document(req: HttpRequest, document_id: SafeIDI64) -> ActixResult<HttpResponse> {
    DOCUMENT_SERVICE.get_document(document_id.0, &req).await
}

pub async fn get_document_url(
    req: HttpRequest,
    document_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    DOCUMENT_SERVICE.get_document_url(document_id.0, &req).await
}

// 凭签名链接下载，无需登录
pub async fn download_document(
    req: HttpRequest,
    document_id: SafeIDI64,
    query: web::Query<DownloadQuery>,
) -> ActixResult<HttpResponse> {
    DOCUMENT_SERVICE
        .download_document(document_id.0, query.into_inner().token, &req)
        .await
}

pub async fn delete_document(
    req: HttpRequest,
    document_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    DOCUMENT_SERVICE.delete_document(document_id.0, &req).await
}

pub fn configure_document_routes(cfg: &mut web::ServiceConfig) {
    // 下载路由先于受保护的 scope 注册
    cfg.service(
        web::resource("/api/documents/{id}/download")
            .route(web::get().to(download_document))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::scope("/api/documents")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_documents))
                    .default_service(web::to(method_not_allowed)),
            )
            .service(
                web::resource("/upload")
                    .route(
                        web::post()
                            .to(upload_document)
                            .wrap(middlewares::RateLimit::document_upload())
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .default_service(web::to(method_not_allowed)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_document))
                    .route(
                        web::delete()
                            .to(delete_document)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .default_service(web::to(method_not_allowed)),
            )
            .service(
                web::resource("/{id}/url")
                    .route(web::get().to(get_document_url))
                    .default_service(web::to(method_not_allowed)),
            ),
    );
}
