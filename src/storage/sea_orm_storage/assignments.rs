use super::SeaOrmStorage;
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::entity::stages::{Column as StageColumn, Entity as Stages};
use crate::errors::{PortalError, Result};
use crate::models::{
    PaginationInfo,
    assignments::{
        entities::{Assignment, AssignmentStatus},
        requests::{AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest},
        responses::AssignmentListResponse,
    },
};
use crate::storage::StageStatusCount;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    pub async fn create_assignment_impl(
        &self,
        req: CreateAssignmentRequest,
        created_by: i64,
    ) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            stage_id: Set(req.stage_id),
            assignee_id: Set(req.assignee_id),
            title: Set(req.title),
            description: Set(req.description),
            status: Set(req
                .status
                .unwrap_or(AssignmentStatus::Pending)
                .to_string()),
            due_date: Set(req.due_date),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            PortalError::database_operation(format!("Failed to create assignment: {e}"))
        })?;

        Ok(result.into_assignment())
    }

    pub async fn get_assignment_by_id_impl(&self, id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(id).one(&self.db).await.map_err(|e| {
            PortalError::database_operation(format!("Failed to query assignment: {e}"))
        })?;

        Ok(result.map(|m| m.into_assignment()))
    }

    pub async fn list_assignments_with_pagination_impl(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Assignments::find();

        if let Some(stage_id) = query.stage_id {
            select = select.filter(Column::StageId.eq(stage_id));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        if let Some(assignee_id) = query.assignee_id {
            select = select.filter(Column::AssigneeId.eq(assignee_id));
        }

        select = select.order_by_asc(Column::DueDate).order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(|e| {
            PortalError::database_operation(format!("Failed to count assignments: {e}"))
        })?;
        let pages = paginator.num_pages().await.map_err(|e| {
            PortalError::database_operation(format!("Failed to count assignment pages: {e}"))
        })?;
        let items = paginator.fetch_page(page - 1).await.map_err(|e| {
            PortalError::database_operation(format!("Failed to list assignments: {e}"))
        })?;

        Ok(AssignmentListResponse {
            items: items.into_iter().map(|m| m.into_assignment()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn list_assignments_for_user_impl(
        &self,
        user_id: i64,
        plan_id: Option<i64>,
    ) -> Result<Vec<Assignment>> {
        let mut select = Assignments::find().filter(Column::AssigneeId.eq(user_id));

        if let Some(plan_id) = plan_id {
            select = select
                .inner_join(Stages)
                .filter(StageColumn::PlanId.eq(plan_id));
        }

        let items = select
            .order_by_asc(Column::StageId)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                PortalError::database_operation(format!("Failed to list assignments: {e}"))
            })?;

        Ok(items.into_iter().map(|m| m.into_assignment()).collect())
    }

    pub async fn list_assignments_by_stage_impl(&self, stage_id: i64) -> Result<Vec<Assignment>> {
        let items = Assignments::find()
            .filter(Column::StageId.eq(stage_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                PortalError::database_operation(format!("Failed to list stage assignments: {e}"))
            })?;

        Ok(items.into_iter().map(|m| m.into_assignment()).collect())
    }

    pub async fn update_assignment_impl(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        if self.get_assignment_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(assignee_id) = update.assignee_id {
            model.assignee_id = Set(assignee_id);
        }
        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }
        if let Some(due_date) = update.due_date {
            model.due_date = Set(Some(due_date));
        }

        model.update(&self.db).await.map_err(|e| {
            PortalError::database_operation(format!("Failed to update assignment: {e}"))
        })?;

        self.get_assignment_by_id_impl(id).await
    }

    pub async fn delete_assignment_impl(&self, id: i64) -> Result<bool> {
        let result = Assignments::delete_by_id(id).exec(&self.db).await.map_err(|e| {
            PortalError::database_operation(format!("Failed to delete assignment: {e}"))
        })?;

        Ok(result.rows_affected > 0)
    }

    /// 计划下各阶段的任务数，按 (stage_id, status) 分组
    pub async fn count_assignments_by_stage_impl(
        &self,
        plan_id: i64,
    ) -> Result<Vec<StageStatusCount>> {
        let rows = Assignments::find()
            .select_only()
            .column(Column::StageId)
            .column(Column::Status)
            .column_as(Column::Id.count(), "count")
            .inner_join(Stages)
            .filter(StageColumn::PlanId.eq(plan_id))
            .group_by(Column::StageId)
            .group_by(Column::Status)
            .into_tuple::<(i64, String, i64)>()
            .all(&self.db)
            .await
            .map_err(|e| {
                PortalError::database_operation(format!("Failed to count assignments: {e}"))
            })?;

        Ok(rows
            .into_iter()
            .filter_map(|(stage_id, status, count)| {
                status.parse::<AssignmentStatus>().ok().map(|status| StageStatusCount {
                    stage_id,
                    status,
                    count,
                })
            })
            .collect())
    }
}
