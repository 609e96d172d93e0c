pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::NaiveDate;
use std::sync::Arc;

use crate::models::assignments::entities::Assignment;
use crate::models::plans::entities::EnrollmentPlan;
use crate::models::stages::requests::{CreateStageRequest, UpdateStageRequest};
use crate::storage::Storage;
use crate::utils::validate::{range_within, validate_date_range};

pub struct StageService {
    storage: Option<Arc<dyn Storage>>,
}

impl StageService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::app_component::<dyn Storage>(request, "Storage"),
        }
    }

    // 计划下的阶段列表
    pub async fn list_stages(&self, plan_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_stages(self, plan_id, request).await
    }

    // 创建阶段
    pub async fn create_stage(
        &self,
        plan_id: i64,
        stage_data: CreateStageRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_stage(self, plan_id, stage_data, request).await
    }

    pub async fn get_stage(&self, stage_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_stage(self, stage_id, request).await
    }

    // 更新阶段
    pub async fn update_stage(
        &self,
        stage_id: i64,
        update_data: UpdateStageRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_stage(self, stage_id, update_data, request).await
    }

    // 删除阶段（级联删除任务）
    pub async fn delete_stage(
        &self,
        stage_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_stage(self, stage_id, request).await
    }
}

/// 阶段日期校验：起止有序，且落在所属计划的范围内
pub(crate) fn check_stage_dates(
    plan: &EnrollmentPlan,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(), String> {
    validate_date_range(start, end).map_err(str::to_string)?;
    if !range_within((start, end), (plan.start_date, plan.end_date)) {
        return Err(format!(
            "Stage dates must be within the plan range ({} to {})",
            plan.start_date, plan.end_date
        ));
    }
    Ok(())
}

/// 阶段新范围必须覆盖其下所有任务的截止日期
pub(crate) fn check_assignment_due_dates(
    assignments: &[Assignment],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(), String> {
    let outside = assignments.iter().find_map(|assignment| {
        assignment
            .due_date
            .filter(|due| *due < start || *due > end)
            .map(|due| (assignment, due))
    });
    match outside {
        Some((assignment, due)) => Err(format!(
            "Stage range must contain the due date of assignment '{}' ({due})",
            assignment.title
        )),
        None => Ok(()),
    }
}

pub(crate) fn check_stage_order(order: i32) -> Result<(), &'static str> {
    if order < 1 {
        return Err("Stage order must be a positive integer");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn plan() -> EnrollmentPlan {
        EnrollmentPlan {
            id: 1,
            name: "Plan".to_string(),
            description: None,
            start_date: d("2025-03-01"),
            end_date: d("2025-06-30"),
            created_by: 1,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_stage_dates_inside_plan() {
        assert!(check_stage_dates(&plan(), d("2025-03-01"), d("2025-06-30")).is_ok());
        assert!(check_stage_dates(&plan(), d("2025-04-10"), d("2025-04-10")).is_ok());
    }

    #[test]
    fn test_stage_dates_rejected() {
        // 起止颠倒
        assert!(check_stage_dates(&plan(), d("2025-05-01"), d("2025-04-01")).is_err());
        // 超出计划范围
        let err = check_stage_dates(&plan(), d("2025-02-28"), d("2025-04-01")).unwrap_err();
        assert!(err.contains("2025-03-01"));
        assert!(check_stage_dates(&plan(), d("2025-06-01"), d("2025-07-01")).is_err());
    }

    #[test]
    fn test_stage_order() {
        assert!(check_stage_order(1).is_ok());
        assert!(check_stage_order(0).is_err());
        assert!(check_stage_order(-3).is_err());
    }
}
