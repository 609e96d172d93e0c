//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assignments;
mod documents;
mod plans;
mod reports;
mod stages;
mod users;

use crate::config::AppConfig;
use crate::errors::{PortalError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 使用配置中的数据库 URL 创建存储
    pub async fn new_async() -> Result<Self> {
        Self::connect(&AppConfig::get().database.url).await
    }

    /// 连接数据库并执行迁移
    pub async fn connect(url: &str) -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(url)?;

        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        Migrator::up(&db, None)
            .await
            .map_err(|e| PortalError::database_operation(format!("Migration failed: {e}")))?;

        info!("SeaORM storage ready, database: {}", redact_url(&db_url));

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL，开启外键）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| PortalError::database_config(format!("Invalid SQLite URL: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| PortalError::database_connection(format!("SQLite connect failed: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(2)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| PortalError::database_connection(format!("Database connect failed: {e}")))
    }

    /// 从 URL 推断数据库类型
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") || url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(PortalError::database_config(format!(
                "Cannot infer database type from URL: {url}. Supported: sqlite://, postgres://, mysql://, or a .db/.sqlite path"
            )))
        }
    }
}

// 日志中隐藏连接串里的密码
fn redact_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}

// Storage trait 实现
use crate::models::{
    assignments::{
        entities::Assignment,
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
use crate::storage::{ReviewOutcome, StageStatusCount, Storage};
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 计划模块
    async fn create_plan(&self, plan: CreatePlanRequest, created_by: i64) -> Result<EnrollmentPlan> {
        self.create_plan_impl(plan, created_by).await
    }

    async fn get_plan_by_id(&self, id: i64) -> Result<Option<EnrollmentPlan>> {
        self.get_plan_by_id_impl(id).await
    }

    async fn list_plans_with_pagination(&self, query: PlanListQuery) -> Result<PlanListResponse> {
        self.list_plans_with_pagination_impl(query).await
    }

    async fn list_plans_by_ids(&self, ids: Option<Vec<i64>>) -> Result<Vec<EnrollmentPlan>> {
        self.list_plans_by_ids_impl(ids).await
    }

    async fn update_plan(
        &self,
        id: i64,
        update: UpdatePlanRequest,
    ) -> Result<Option<EnrollmentPlan>> {
        self.update_plan_impl(id, update).await
    }

    async fn delete_plan(&self, id: i64) -> Result<bool> {
        self.delete_plan_impl(id).await
    }

    // 阶段模块
    async fn create_stage(&self, plan_id: i64, stage: CreateStageRequest) -> Result<Stage> {
        self.create_stage_impl(plan_id, stage).await
    }

    async fn get_stage_by_id(&self, id: i64) -> Result<Option<Stage>> {
        self.get_stage_by_id_impl(id).await
    }

    async fn list_stages_by_plan(&self, plan_id: i64) -> Result<Vec<Stage>> {
        self.list_stages_by_plan_impl(plan_id).await
    }

    async fn stage_order_exists(
        &self,
        plan_id: i64,
        order: i32,
        exclude_stage_id: Option<i64>,
    ) -> Result<bool> {
        self.stage_order_exists_impl(plan_id, order, exclude_stage_id)
            .await
    }

    async fn update_stage(&self, id: i64, update: UpdateStageRequest) -> Result<Option<Stage>> {
        self.update_stage_impl(id, update).await
    }

    async fn delete_stage(&self, id: i64) -> Result<bool> {
        self.delete_stage_impl(id).await
    }

    // 任务模块
    async fn create_assignment(
        &self,
        assignment: CreateAssignmentRequest,
        created_by: i64,
    ) -> Result<Assignment> {
        self.create_assignment_impl(assignment, created_by).await
    }

    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(id).await
    }

    async fn list_assignments_with_pagination(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse> {
        self.list_assignments_with_pagination_impl(query).await
    }

    async fn list_assignments_for_user(
        &self,
        user_id: i64,
        plan_id: Option<i64>,
    ) -> Result<Vec<Assignment>> {
        self.list_assignments_for_user_impl(user_id, plan_id).await
    }

    async fn list_assignments_by_stage(&self, stage_id: i64) -> Result<Vec<Assignment>> {
        self.list_assignments_by_stage_impl(stage_id).await
    }

    async fn update_assignment(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        self.update_assignment_impl(id, update).await
    }

    async fn delete_assignment(&self, id: i64) -> Result<bool> {
        self.delete_assignment_impl(id).await
    }

    async fn count_assignments_by_stage(&self, plan_id: i64) -> Result<Vec<StageStatusCount>> {
        self.count_assignments_by_stage_impl(plan_id).await
    }

    // 报告模块
    async fn create_report(&self, report: CreateReportRequest, author_id: i64) -> Result<Report> {
        self.create_report_impl(report, author_id).await
    }

    async fn get_report_by_id(&self, id: i64) -> Result<Option<Report>> {
        self.get_report_by_id_impl(id).await
    }

    async fn list_reports_with_pagination(
        &self,
        query: ReportListQuery,
    ) -> Result<ReportListResponse> {
        self.list_reports_with_pagination_impl(query).await
    }

    async fn review_report(
        &self,
        id: i64,
        status: ReportStatus,
        review_note: Option<String>,
        reviewer_id: i64,
    ) -> Result<ReviewOutcome> {
        self.review_report_impl(id, status, review_note, reviewer_id)
            .await
    }

    async fn delete_report(&self, id: i64) -> Result<bool> {
        self.delete_report_impl(id).await
    }

    // 文档模块
    async fn create_document(&self, document: NewDocument) -> Result<Document> {
        self.create_document_impl(document).await
    }

    async fn get_document_by_id(&self, id: i64) -> Result<Option<Document>> {
        self.get_document_by_id_impl(id).await
    }

    async fn list_documents_with_pagination(
        &self,
        query: DocumentListQuery,
    ) -> Result<DocumentListResponse> {
        self.list_documents_with_pagination_impl(query).await
    }

    async fn delete_document(&self, id: i64) -> Result<bool> {
        self.delete_document_impl(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("portal.db").unwrap(),
            "sqlite://portal.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://u:p@localhost/portal").unwrap(),
            "postgres://u:p@localhost/portal"
        );
        assert!(SeaOrmStorage::build_database_url("portal").is_err());
    }

    #[test]
    fn test_redact_url() {
        assert_eq!(
            redact_url("postgres://admin:secret@db:5432/portal"),
            "postgres://***@db:5432/portal"
        );
        assert_eq!(redact_url("sqlite://portal.db"), "sqlite://portal.db");
    }
}
