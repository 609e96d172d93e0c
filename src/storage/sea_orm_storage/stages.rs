use super::SeaOrmStorage;
use crate::entity::assignments::{Column as AssignmentColumn, Entity as Assignments};
use crate::entity::stages::{ActiveModel, Column, Entity as Stages};
use crate::errors::{PortalError, Result};
use crate::models::stages::{
    entities::Stage,
    requests::{CreateStageRequest, UpdateStageRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    pub async fn create_stage_impl(&self, plan_id: i64, req: CreateStageRequest) -> Result<Stage> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            plan_id: Set(plan_id),
            name: Set(req.name),
            description: Set(req.description),
            stage_order: Set(req.order),
            start_date: Set(req.start_date),
            end_date: Set(req.end_date),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to create stage: {e}")))?;

        Ok(result.into_stage())
    }

    pub async fn get_stage_by_id_impl(&self, id: i64) -> Result<Option<Stage>> {
        let result = Stages::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to query stage: {e}")))?;

        Ok(result.map(|m| m.into_stage()))
    }

    pub async fn list_stages_by_plan_impl(&self, plan_id: i64) -> Result<Vec<Stage>> {
        let stages = Stages::find()
            .filter(Column::PlanId.eq(plan_id))
            .order_by_asc(Column::StageOrder)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("Failed to list stages: {e}")))?;

        Ok(stages.into_iter().map(|m| m.into_stage()).collect())
    }

    pub async fn stage_order_exists_impl(
        &self,
        plan_id: i64,
        order: i32,
        exclude_stage_id: Option<i64>,
    ) -> Result<bool> {
        let mut select = Stages::find()
            .filter(Column::PlanId.eq(plan_id))
            .filter(Column::StageOrder.eq(order));

        if let Some(stage_id) = exclude_stage_id {
            select = select.filter(Column::Id.ne(stage_id));
        }

        let count = select.count(&self.db).await.map_err(|e| {
            PortalError::database_operation(format!("Failed to check stage order: {e}"))
        })?;

        Ok(count > 0)
    }

    pub async fn update_stage_impl(
        &self,
        id: i64,
        update: UpdateStageRequest,
    ) -> Result<Option<Stage>> {
        if self.get_stage_by_id_impl(id).await?.is_none() {
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
        if let Some(order) = update.order {
            model.stage_order = Set(order);
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
            .map_err(|e| PortalError::database_operation(format!("Failed to update stage: {e}")))?;

        self.get_stage_by_id_impl(id).await
    }

    /// 阶段与其任务在同一事务内删除
    pub async fn delete_stage_impl(&self, id: i64) -> Result<bool> {
        let txn = self.db.begin().await?;

        Assignments::delete_many()
            .filter(AssignmentColumn::StageId.eq(id))
            .exec(&txn)
            .await?;

        let result = Stages::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }
}
