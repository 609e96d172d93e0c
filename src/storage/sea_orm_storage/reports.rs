use super::SeaOrmStorage;
use crate::entity::reports::{ActiveModel, Column, Entity as Reports};
use crate::errors::{PortalError, Result};
use crate::storage::ReviewOutcome;
use crate::models::{
    PaginationInfo,
    reports::{
        entities::{Report, ReportStatus},
        requests::{CreateReportRequest, ReportListQuery},
        responses::ReportListResponse,
    },
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_report_impl(
        &self,
        req: CreateReportRequest,
        author_id: i64,
    ) -> Result<Report> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            author_id: Set(author_id),
            plan_id: Set(req.plan_id),
            title: Set(req.title),
            content: Set(req.content),
            status: Set(ReportStatus::Submitted.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to create report: {e}")))?;

        Ok(result.into_report())
    }

    pub async fn get_report_by_id_impl(&self, id: i64) -> Result<Option<Report>> {
        let result = Reports::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to query report: {e}")))?;

        Ok(result.map(|m| m.into_report()))
    }

    /// 最新提交的在前
    pub async fn list_reports_with_pagination_impl(
        &self,
        query: ReportListQuery,
    ) -> Result<ReportListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Reports::find();

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        if let Some(plan_id) = query.plan_id {
            select = select.filter(Column::PlanId.eq(plan_id));
        }
        if let Some(author_id) = query.author_id {
            select = select.filter(Column::AuthorId.eq(author_id));
        }

        select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(|e| {
            PortalError::database_operation(format!("Failed to count reports: {e}"))
        })?;
        let pages = paginator.num_pages().await.map_err(|e| {
            PortalError::database_operation(format!("Failed to count report pages: {e}"))
        })?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to list reports: {e}")))?;

        Ok(ReportListResponse {
            items: items.into_iter().map(|m| m.into_report()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 条件更新：已审阅的报告不会被覆盖
    pub async fn review_report_impl(
        &self,
        id: i64,
        status: ReportStatus,
        review_note: Option<String>,
        reviewer_id: i64,
    ) -> Result<ReviewOutcome> {
        let now = chrono::Utc::now().timestamp();

        let result = Reports::update_many()
            .col_expr(Column::Status, Expr::value(status.to_string()))
            .col_expr(Column::ReviewNote, Expr::value(review_note))
            .col_expr(Column::ReviewedBy, Expr::value(Some(reviewer_id)))
            .col_expr(Column::ReviewedAt, Expr::value(Some(now)))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.ne(ReportStatus::Reviewed.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to review report: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(match self.get_report_by_id_impl(id).await? {
                Some(_) => ReviewOutcome::AlreadyReviewed,
                None => ReviewOutcome::NotFound,
            });
        }

        match self.get_report_by_id_impl(id).await? {
            Some(report) => Ok(ReviewOutcome::Reviewed(report)),
            None => Ok(ReviewOutcome::NotFound),
        }
    }

    pub async fn delete_report_impl(&self, id: i64) -> Result<bool> {
        let result = Reports::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to delete report: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
