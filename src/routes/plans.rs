use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::method_not_allowed;
use crate::middlewares;
use crate::models::plans::requests::{CreatePlanRequest, PlanListParams, UpdatePlanRequest};
use crate::models::stages::requests::CreateStageRequest;
use crate::models::users::entities::UserRole;
use crate::services::{PlanService, StageService};
use crate::utils::SafeIDI64;

static PLAN_SERVICE: Lazy<PlanService> = Lazy::new(PlanService::new_lazy);
static STAGE_SERVICE: Lazy<StageService> = Lazy::new(StageService::new_lazy);

pub async fn list_plans(
    req: HttpRequest,
    query: web::Query<PlanListParams>,
) -> ActixResult<HttpResponse> {
    PLAN_SERVICE.list_plans(query.into_inner(), &req).await
}

pub async fn create_plan(
    req: HttpRequest,
    plan_data: web::Json<CreatePlanRequest>,
) -> ActixResult<HttpResponse> {
    PLAN_SERVICE.create_plan(plan_data.into_inner(), &req).await
}

pub async fn get_plan(req: HttpRequest, plan_id: SafeIDI64) -> ActixResult<HttpResponse> {
    PLAN_SERVICE.get_plan(plan_id.0, &req).await
}

pub async fn update_plan(
    req: HttpRequest,
    plan_id: SafeIDI64,
    update_data: web::Json<UpdatePlanRequest>,
) -> ActixResult<HttpResponse> {
    PLAN_SERVICE
        .update_plan(plan_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_plan(req: HttpRequest, plan_id: SafeIDI64) -> ActixResult<HttpResponse> {
    PLAN_SERVICE.delete_plan(plan_id.0, &req).await
}

pub async fn get_plan_progress(req: HttpRequest, plan_id: SafeIDI64) -> ActixResult<HttpResponse> {
    PLAN_SERVICE.get_progress(plan_id.0, &req).await
}

pub async fn list_plan_stages(req: HttpRequest, plan_id: SafeIDI64) -> ActixResult<HttpResponse> {
    STAGE_SERVICE.list_stages(plan_id.0, &req).await
}

pub async fn create_plan_stage(
    req: HttpRequest,
    plan_id: SafeIDI64,
    stage_data: web::Json<CreateStageRequest>,
) -> ActixResult<HttpResponse> {
    STAGE_SERVICE
        .create_stage(plan_id.0, stage_data.into_inner(), &req)
        .await
}

// 配置路由：读取对所有登录用户开放，写入仅限管理员
pub fn configure_plan_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/plans")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_plans))
                    .route(
                        web::post()
                            .to(create_plan)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .default_service(web::to(method_not_allowed)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_plan))
                    .route(
                        web::put()
                            .to(update_plan)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_plan)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .default_service(web::to(method_not_allowed)),
            )
            .service(
                web::resource("/{id}/progress")
                    .route(web::get().to(get_plan_progress))
                    .default_service(web::to(method_not_allowed)),
            )
            .service(
                web::resource("/{id}/stages")
                    .route(web::get().to(list_plan_stages))
                    .route(
                        web::post()
                            .to(create_plan_stage)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .default_service(web::to(method_not_allowed)),
            ),
    );
}
