use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;

use super::PlanService;
use crate::errors::Result;
use crate::models::assignments::entities::AssignmentStatus;
use crate::models::plans::entities::{EnrollmentPlan, PlanProgress, StageProgress, StatusCounts};
use crate::models::stages::entities::Stage;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{internal_error, not_found};
use crate::storage::{StageStatusCount, Storage};

/// 按阶段汇总任务状态计数，阶段顺序与 `stages` 一致
pub fn build_progress(
    plan: EnrollmentPlan,
    stages: Vec<Stage>,
    counts: &[StageStatusCount],
) -> PlanProgress {
    let mut by_stage: HashMap<i64, StatusCounts> = HashMap::new();
    for row in counts {
        let entry = by_stage.entry(row.stage_id).or_default();
        entry.total += row.count;
        match row.status {
            AssignmentStatus::Pending => entry.pending += row.count,
            AssignmentStatus::InProgress => entry.in_progress += row.count,
            AssignmentStatus::Completed => entry.completed += row.count,
            AssignmentStatus::Cancelled => entry.cancelled += row.count,
        }
    }

    let mut totals = StatusCounts::default();
    let stages = stages
        .into_iter()
        .map(|stage| {
            let counts = by_stage.remove(&stage.id).unwrap_or_default();
            totals.accumulate(&counts);
            StageProgress {
                stage_id: stage.id,
                name: stage.name,
                order: stage.order,
                start_date: stage.start_date,
                end_date: stage.end_date,
                completion_rate: counts.completion_rate(),
                counts,
            }
        })
        .collect();

    let completion_rate = totals.completion_rate();
    PlanProgress {
        plan,
        stages,
        totals,
        completion_rate,
    }
}

/// 读取阶段与计数并汇总
pub async fn load_plan_progress(
    storage: &dyn Storage,
    plan: EnrollmentPlan,
) -> Result<PlanProgress> {
    let stages = storage.list_stages_by_plan(plan.id).await?;
    let counts = storage.count_assignments_by_stage(plan.id).await?;
    Ok(build_progress(plan, stages, &counts))
}

pub async fn get_progress(
    service: &PlanService,
    plan_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let plan = match storage.get_plan_by_id(plan_id).await {
        Ok(Some(plan)) => plan,
        Ok(None) => return Ok(not_found(ErrorCode::PlanNotFound, "Plan not found")),
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::InternalServerError,
                "Failed to get plan",
                e,
            ));
        }
    };

    match load_plan_progress(storage.as_ref(), plan).await {
        Ok(progress) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            progress,
            "Plan progress retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to compute plan progress",
            e,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn plan() -> EnrollmentPlan {
        EnrollmentPlan {
            id: 1,
            name: "Tuyển sinh 2025".to_string(),
            description: None,
            start_date: d("2025-03-01"),
            end_date: d("2025-09-30"),
            created_by: 1,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn stage(id: i64, order: i32) -> Stage {
        Stage {
            id,
            plan_id: 1,
            name: format!("Stage {order}"),
            description: None,
            order,
            start_date: d("2025-03-01"),
            end_date: d("2025-04-30"),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn count(stage_id: i64, status: AssignmentStatus, count: i64) -> StageStatusCount {
        StageStatusCount {
            stage_id,
            status,
            count,
        }
    }

    #[test]
    fn test_progress_per_stage_and_totals() {
        let counts = vec![
            count(10, AssignmentStatus::Completed, 3),
            count(10, AssignmentStatus::Pending, 1),
            count(11, AssignmentStatus::InProgress, 2),
            count(11, AssignmentStatus::Cancelled, 2),
        ];
        let progress = build_progress(plan(), vec![stage(10, 1), stage(11, 2)], &counts);

        assert_eq!(progress.stages.len(), 2);
        assert_eq!(progress.stages[0].counts.total, 4);
        assert!((progress.stages[0].completion_rate - 0.75).abs() < f64::EPSILON);
        assert_eq!(progress.stages[1].counts.cancelled, 2);
        assert_eq!(progress.stages[1].completion_rate, 0.0);

        assert_eq!(progress.totals.total, 8);
        assert_eq!(progress.totals.completed, 3);
        // 3 / (8 - 2)
        assert!((progress.completion_rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stage_without_assignments() {
        let progress = build_progress(plan(), vec![stage(5, 1)], &[]);
        assert_eq!(progress.stages[0].counts, StatusCounts::default());
        assert_eq!(progress.completion_rate, 0.0);
    }
}
