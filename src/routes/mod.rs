pub mod assignments;

pub mod auth;

pub mod documents;

pub mod plans;

pub mod reports;

pub mod stages;

pub mod users;

pub mod video;

pub use assignments::configure_assignment_routes;
pub use auth::configure_auth_routes;
pub use documents::configure_document_routes;
pub use plans::configure_plan_routes;
pub use reports::configure_report_routes;
pub use stages::configure_stage_routes;
pub use users::configure_user_routes;
pub use video::configure_video_routes;

use actix_web::{HttpResponse, web};

use crate::models::{ApiResponse, ErrorCode};

// 资源存在但方法不匹配
pub async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().json(ApiResponse::error_empty(
        ErrorCode::MethodNotAllowed,
        "Method not allowed",
    ))
}

// 未匹配任何路由
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::NotFound,
        "Resource not found",
    ))
}

/// 注册全部 API 路由
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_auth_routes)
        .configure(configure_user_routes)
        .configure(configure_plan_routes)
        .configure(configure_stage_routes)
        .configure(configure_assignment_routes)
        .configure(configure_report_routes)
        .configure(configure_document_routes)
        .configure(configure_video_routes);
}
