use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::method_not_allowed;
use crate::middlewares;
use crate::models::reports::requests::{
    CreateReportRequest, DraftReportRequest, GeneratePlanReportRequest, ReportListParams,
    ReviewReportRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::ReportService;
use crate::utils::SafeIDI64;

// 懒加载的全局 ReportService 实例
static REPORT_SERVICE: Lazy<ReportService> = Lazy::new(ReportService::new_lazy);

pub async fn list_reports(
    req: HttpRequest,
    query: web::Query<ReportListParams>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.list_reports(query.into_inner(), &req).await
}

pub async fn create_report(
    req: HttpRequest,
    report_data: web::Json<CreateReportRequest>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE
        .create_report(report_data.into_inner(), &req)
        .await
}

pub async fn get_report(req: HttpRequest, report_id: SafeIDI64) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.get_report(report_id.0, &req).await
}

pub async fn review_report(
    req: HttpRequest,
    report_id: SafeIDI64,
    review_data: web::Json<ReviewReportRequest>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE
        .review_report(report_id.0, review_data.into_inner(), &req)
        .await
}

pub async fn delete_report(req: HttpRequest, report_id: SafeIDI64) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.delete_report(report_id.0, &req).await
}

pub async fn generate_plan_report(
    req: HttpRequest,
    generate_data: web::Json<GeneratePlanReportRequest>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE
        .generate_plan_report(generate_data.into_inner(), &req)
        .await
}

pub async fn draft_report(
    req: HttpRequest,
    draft_data: web::Json<DraftReportRequest>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE
        .draft_report(draft_data.into_inner(), &req)
        .await
}

// 配置路由：`/plans` 与 `/draft` 需先于 `/{id}` 注册
pub fn configure_report_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/reports")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_reports))
                    .route(web::post().to(create_report))
                    .default_service(web::to(method_not_allowed)),
            )
            .service(
                web::resource("/plans")
                    .route(
                        web::post()
                            .to(generate_plan_report)
                            .wrap(middlewares::RateLimit::ai_generation())
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .default_service(web::to(method_not_allowed)),
            )
            .service(
                web::resource("/draft")
                    .route(
                        web::post()
                            .to(draft_report)
                            .wrap(middlewares::RateLimit::ai_generation()),
                    )
                    .default_service(web::to(method_not_allowed)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_report))
                    .route(web::delete().to(delete_report))
                    .default_service(web::to(method_not_allowed)),
            )
            .service(
                web::resource("/{id}/review")
                    .route(
                        web::put()
                            .to(review_report)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .default_service(web::to(method_not_allowed)),
            ),
    );
}
