use std::sync::Arc;

use crate::models::{
    assignments::{
        entities::{Assignment, AssignmentStatus},
        requests::{AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest},
        responses::AssignmentListResponse,
    },
    documents::{
        entities::Document,
        requests::{DocumentListQuery, NewDocument},
        responses::DocumentListResponse,
    },
    plans::{
        entities::EnrollmentPlan,
        requests::{CreatePlanRequest, PlanListQuery, UpdatePlanRequest},
        responses::PlanListResponse,
    },
    reports::{
        entities::{Report, ReportStatus},
        requests::{CreateReportRequest, ReportListQuery},
        responses::ReportListResponse,
    },
    stages::{
        entities::Stage,
        requests::{CreateStageRequest, UpdateStageRequest},
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};

use crate::errors::Result;

pub mod blob;
pub mod sea_orm_storage;

pub use blob::{BlobStore, LocalBlobStore};

/// 某阶段某状态下的任务数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageStatusCount {
    pub stage_id: i64,
    pub status: AssignmentStatus,
    pub count: i64,
}

/// 审阅写入结果
#[derive(Debug, Clone)]
pub enum ReviewOutcome {
    Reviewed(Report),
    // 写入时报告已是 reviewed 终态
    AlreadyReviewed,
    NotFound,
}

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（password 字段已是哈希）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户（password 字段已是哈希）
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    async fn delete_user(&self, id: i64) -> Result<bool>;
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    async fn count_users(&self) -> Result<u64>;

    /// 招生计划
    async fn create_plan(&self, plan: CreatePlanRequest, created_by: i64) -> Result<EnrollmentPlan>;
    async fn get_plan_by_id(&self, id: i64) -> Result<Option<EnrollmentPlan>>;
    async fn list_plans_with_pagination(&self, query: PlanListQuery) -> Result<PlanListResponse>;
    // ids 为 None 时返回全部计划
    async fn list_plans_by_ids(&self, ids: Option<Vec<i64>>) -> Result<Vec<EnrollmentPlan>>;
    async fn update_plan(
        &self,
        id: i64,
        update: UpdatePlanRequest,
    ) -> Result<Option<EnrollmentPlan>>;
    // 级联删除阶段与任务
    async fn delete_plan(&self, id: i64) -> Result<bool>;

    /// 招生阶段
    async fn create_stage(&self, plan_id: i64, stage: CreateStageRequest) -> Result<Stage>;
    async fn get_stage_by_id(&self, id: i64) -> Result<Option<Stage>>;
    // 按 order 升序
    async fn list_stages_by_plan(&self, plan_id: i64) -> Result<Vec<Stage>>;
    // 同一计划内 order 是否已被占用，可排除某个阶段自身
    async fn stage_order_exists(
        &self,
        plan_id: i64,
        order: i32,
        exclude_stage_id: Option<i64>,
    ) -> Result<bool>;
    async fn update_stage(&self, id: i64, update: UpdateStageRequest) -> Result<Option<Stage>>;
    // 级联删除任务
    async fn delete_stage(&self, id: i64) -> Result<bool>;

    /// 任务分配
    async fn create_assignment(
        &self,
        assignment: CreateAssignmentRequest,
        created_by: i64,
    ) -> Result<Assignment>;
    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>>;
    async fn list_assignments_with_pagination(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse>;
    // 某用户的全部任务，可限定计划
    async fn list_assignments_for_user(
        &self,
        user_id: i64,
        plan_id: Option<i64>,
    ) -> Result<Vec<Assignment>>;
    async fn list_assignments_by_stage(&self, stage_id: i64) -> Result<Vec<Assignment>>;
    async fn update_assignment(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>>;
    async fn delete_assignment(&self, id: i64) -> Result<bool>;
    // 计划内按阶段和状态分组计数
    async fn count_assignments_by_stage(&self, plan_id: i64) -> Result<Vec<StageStatusCount>>;

    /// 报告
    async fn create_report(&self, report: CreateReportRequest, author_id: i64) -> Result<Report>;
    async fn get_report_by_id(&self, id: i64) -> Result<Option<Report>>;
    async fn list_reports_with_pagination(
        &self,
        query: ReportListQuery,
    ) -> Result<ReportListResponse>;
    async fn review_report(
        &self,
        id: i64,
        status: ReportStatus,
        review_note: Option<String>,
        reviewer_id: i64,
    ) -> Result<ReviewOutcome>;
    async fn delete_report(&self, id: i64) -> Result<bool>;

    /// 文档元数据
    async fn create_document(&self, document: NewDocument) -> Result<Document>;
    async fn get_document_by_id(&self, id: i64) -> Result<Option<Document>>;
    async fn list_documents_with_pagination(
        &self,
        query: DocumentListQuery,
    ) -> Result<DocumentListResponse>;
    async fn delete_document(&self, id: i64) -> Result<bool>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}

/// 使用指定的数据库 URL 创建存储（会执行迁移）
pub async fn create_storage_with_url(url: &str) -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::connect(url).await?;
    Ok(Arc::new(storage))
}
