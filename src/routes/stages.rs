use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::method_not_allowed;
use crate::middlewares;
use crate::models::stages::requests::UpdateStageRequest;
use crate::models::users::entities::UserRole;
use crate::services::StageService;
use crate::utils::SafeIDI64;

static STAGE_SERVICE: Lazy<StageService> = Lazy::new(StageService::new_lazy);

pub async fn get_stage(req: HttpRequest, stage_id: SafeIDI64) -> ActixResult<HttpResponse> {
    STAGE_SERVICE.get_stage(stage_id.0, &req).await
}

pub async fn update_stage(
    req: HttpRequest,
    stage_id: SafeIDI64,
    update_data: web::Json<UpdateStageRequest>,
) -> ActixResult<HttpResponse> {
    STAGE_SERVICE
        .update_stage(stage_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_stage(req: HttpRequest, stage_id: SafeIDI64) -> ActixResult<HttpResponse> {
    STAGE_SERVICE.delete_stage(stage_id.0, &req).await
}

// 列表与创建挂在 /api/plans/{id}/stages 下
pub fn configure_stage_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/stages")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_stage))
                    .route(
                        web::put()
                            .to(update_stage)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_stage)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .default_service(web::to(method_not_allowed)),
            ),
    );
}
