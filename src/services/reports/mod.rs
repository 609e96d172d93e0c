pub mod create;
pub mod delete;
pub mod generate;
pub mod get;
pub mod list;
pub mod prompt;
pub mod review;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::integrations::TextGenerator;
use crate::models::reports::entities::Report;
use crate::models::reports::requests::{
    CreateReportRequest, DraftReportRequest, GeneratePlanReportRequest, ReportListParams,
    ReviewReportRequest,
};
use crate::models::users::entities::User;
use crate::storage::Storage;

pub struct ReportService {
    storage: Option<Arc<dyn Storage>>,
}

impl ReportService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::app_component::<dyn Storage>(request, "Storage"),
        }
    }

    pub(crate) fn get_generator(&self, request: &HttpRequest) -> ActixResult<Arc<dyn TextGenerator>> {
        super::app_component::<dyn TextGenerator>(request, "TextGenerator")
    }

    // 报告列表，教师只能看到自己的报告
    pub async fn list_reports(
        &self,
        query: ReportListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_reports(self, query, request).await
    }

    // 提交报告
    pub async fn create_report(
        &self,
        report_data: CreateReportRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_report(self, report_data, request).await
    }

    pub async fn get_report(&self, report_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_report(self, report_id, request).await
    }

    // 审阅报告
    pub async fn review_report(
        &self,
        report_id: i64,
        review_data: ReviewReportRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        review::review_report(self, report_id, review_data, request).await
    }

    pub async fn delete_report(
        &self,
        report_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_report(self, report_id, request).await
    }

    // 基于招生计划生成报告
    pub async fn generate_plan_report(
        &self,
        generate_data: GeneratePlanReportRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        generate::generate_plan_report(self, generate_data, request).await
    }

    // 基于个人任务起草报告
    pub async fn draft_report(
        &self,
        draft_data: DraftReportRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        generate::draft_report(self, draft_data, request).await
    }
}

/// 作者本人或管理员可以查看
pub(crate) fn can_view(user: &User, report: &Report) -> bool {
    user.is_admin() || report.author_id == user.id
}
