use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::stages::entities::Stage;

// 招生计划
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/plan.ts")]
pub struct EnrollmentPlan {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 计划详情（含按顺序排列的阶段）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/plan.ts")]
pub struct PlanDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub plan: EnrollmentPlan,
    pub stages: Vec<Stage>,
}

// 单个阶段的任务进度
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/plan.ts")]
pub struct StatusCounts {
    pub total: i64,
    pub pending: i64,
    pub in_progress: i64,
    pub completed: i64,
    pub cancelled: i64,
}

impl StatusCounts {
    /// 已完成 / 有效任务（不含已取消）
    pub fn completion_rate(&self) -> f64 {
        let active = self.total - self.cancelled;
        if active <= 0 {
            0.0
        } else {
            self.completed as f64 / active as f64
        }
    }

    pub fn accumulate(&mut self, other: &StatusCounts) {
        self.total += other.total;
        self.pending += other.pending;
        self.in_progress += other.in_progress;
        self.completed += other.completed;
        self.cancelled += other.cancelled;
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/plan.ts")]
pub struct StageProgress {
    pub stage_id: i64,
    pub name: String,
    pub order: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub counts: StatusCounts,
    pub completion_rate: f64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/plan.ts")]
pub struct PlanProgress {
    pub plan: EnrollmentPlan,
    pub stages: Vec<StageProgress>,
    pub totals: StatusCounts,
    pub completion_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_rate_ignores_cancelled() {
        let counts = StatusCounts {
            total: 5,
            pending: 1,
            in_progress: 0,
            completed: 3,
            cancelled: 1,
        };
        assert!((counts.completion_rate() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_completion_rate_empty_stage() {
        assert_eq!(StatusCounts::default().completion_rate(), 0.0);
    }

    #[test]
    fn test_accumulate() {
        let mut totals = StatusCounts::default();
        totals.accumulate(&StatusCounts {
            total: 2,
            pending: 2,
            ..Default::default()
        });
        totals.accumulate(&StatusCounts {
            total: 1,
            completed: 1,
            ..Default::default()
        });
        assert_eq!(totals.total, 3);
        assert_eq!(totals.pending, 2);
        assert_eq!(totals.completed, 1);
    }
}
