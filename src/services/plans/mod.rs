pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod progress;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::plans::requests::{CreatePlanRequest, PlanListParams, UpdatePlanRequest};
use crate::storage::Storage;

pub struct PlanService {
    storage: Option<Arc<dyn Storage>>,
}

impl PlanService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::app_component::<dyn Storage>(request, "Storage"),
        }
    }

    // 计划列表
    pub async fn list_plans(
        &self,
        query: PlanListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_plans(self, query, request).await
    }

    // 创建计划
    pub async fn create_plan(
        &self,
        plan_data: CreatePlanRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_plan(self, plan_data, request).await
    }

    // 计划详情（含阶段）
    pub async fn get_plan(&self, plan_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_plan(self, plan_id, request).await
    }

    // 更新计划
    pub async fn update_plan(
        &self,
        plan_id: i64,
        update_data: UpdatePlanRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_plan(self, plan_id, update_data, request).await
    }

    // 删除计划
    pub async fn delete_plan(
        &self,
        plan_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_plan(self, plan_id, request).await
    }

    // 计划进度统计
    pub async fn get_progress(
        &self,
        plan_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        progress::get_progress(self, plan_id, request).await
    }
}
