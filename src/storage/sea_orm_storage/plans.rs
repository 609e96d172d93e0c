use super::SeaOrmStorage;
use crate::entity::assignments::{Column as AssignmentColumn, Entity as Assignments};
use crate::entity::enrollment_plans::{ActiveModel, Column, Entity as EnrollmentPlans};
use crate::entity::reports::{Column as ReportColumn, Entity as Reports};
use crate::entity::stages::{Column as StageColumn, Entity as Stages};
use crate::errors::{PortalError, Result};
use crate::models::{
    PaginationInfo,
    plans::{
        entities::EnrollmentPlan,
        requests::{CreatePlanRequest, PlanListQuery, UpdatePlanRequest},
        responses::PlanListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    pub async fn create_plan_impl(
        &self,
        req: CreatePlanRequest,
        created_by: i64,
    ) -> Result<EnrollmentPlan> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            description: Set(req.description),
            start_date: Set(req.start_date),
            end_date: Set(req.end_date),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to create plan: {e}")))?;

        Ok(result.into_plan())
    }

    pub async fn get_plan_by_id_impl(&self, id: i64) -> Result<Option<EnrollmentPlan>> {
        let result = EnrollmentPlans::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to query plan: {e}")))?;

        Ok(result.map(|m| m.into_plan()))
    }

    /// 按开始日期倒序分页
    pub async fn list_plans_with_pagination_impl(
        &self,
        query: PlanListQuery,
    ) -> Result<PlanListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = EnrollmentPlans::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let pattern = format!("%{}%", escape_like_pattern(search.trim()));
            select = select.filter(Column::Name.like(LikeExpr::new(pattern).escape('\\')));
        }

        select = select
            .order_by_desc(Column::StartDate)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(|e| {
            PortalError::database_operation(format!("Failed to count plans: {e}"))
        })?;
        let pages = paginator.num_pages().await.map_err(|e| {
            PortalError::database_operation(format!("Failed to count plan pages: {e}"))
        })?;
        let plans = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to list plans: {e}")))?;

        Ok(PlanListResponse {
            items: plans.into_iter().map(|m| m.into_plan()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn list_plans_by_ids_impl(
        &self,
        ids: Option<Vec<i64>>,
    ) -> Result<Vec<EnrollmentPlan>> {
        let mut select = EnrollmentPlans::find();
        if let Some(ids) = ids {
            select = select.filter(Column::Id.is_in(ids));
        }

        let plans = select
            .order_by_desc(Column::StartDate)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to list plans: {e}")))?;

        Ok(plans.into_iter().map(|m| m.into_plan()).collect())
    }

    pub async fn update_plan_impl(
        &self,
        id: i64,
        update: UpdatePlanRequest,
    ) -> Result<Option<EnrollmentPlan>> {
        if self.get_plan_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(start_date) = update.start_date {
            model.start_date = Set(start_date);
        }
        if let Some(end_date) = update.end_date {
            model.end_date = Set(end_date);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to update plan: {e}")))?;

        self.get_plan_by_id_impl(id).await
    }

    /// 在同一事务内删除任务、阶段并解除报告关联，再删除计划
    pub async fn delete_plan_impl(&self, id: i64) -> Result<bool> {
        let txn = self.db.begin().await?;

        let stage_ids = Stages::find()
            .select_only()
            .column(StageColumn::Id)
            .filter(StageColumn::PlanId.eq(id))
            .into_tuple::<i64>()
            .all(&txn)
            .await?;

        if !stage_ids.is_empty() {
            Assignments::delete_many()
                .filter(AssignmentColumn::StageId.is_in(stage_ids))
                .exec(&txn)
                .await?;
        }

        Stages::delete_many()
            .filter(StageColumn::PlanId.eq(id))
            .exec(&txn)
            .await?;

        Reports::update_many()
            .col_expr(ReportColumn::PlanId, Expr::value(Option::<i64>::None))
            .filter(ReportColumn::PlanId.eq(id))
            .exec(&txn)
            .await?;

        let result = EnrollmentPlans::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }
}
