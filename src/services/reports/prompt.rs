//! AI 报告提示词
//!
//! 提示词只包含计划、阶段与任务的结构化摘要，模型输出 Markdown。

use std::collections::HashMap;

use crate::models::assignments::entities::Assignment;
use crate::models::plans::entities::PlanProgress;
use crate::models::users::entities::User;

const REPORT_LANGUAGE_HINT: &str = "Write the report in Vietnamese, formatted as Markdown.";

fn percent(rate: f64) -> String {
    format!("{:.0}%", rate * 100.0)
}

fn push_instructions(prompt: &mut String, instructions: Option<&str>) {
    if let Some(extra) = instructions.map(str::trim).filter(|s| !s.is_empty()) {
        prompt.push_str("\n## Additional instructions\n");
        prompt.push_str(extra);
        prompt.push('\n');
    }
}

/// 招生计划汇总报告
pub fn build_plans_prompt(plans: &[PlanProgress], instructions: Option<&str>) -> String {
    let mut prompt = String::new();
    prompt.push_str(
        "You are assisting the admissions committee of a university campus. \
         Write a progress report on the enrollment plans below. \
         Summarise overall progress, highlight stages that are behind schedule \
         or have many pending assignments, and finish with concrete recommendations.\n",
    );
    prompt.push_str(REPORT_LANGUAGE_HINT);
    prompt.push_str("\n\n");

    if plans.is_empty() {
        prompt.push_str("There are currently no enrollment plans.\n");
    }

    for progress in plans {
        let plan = &progress.plan;
        prompt.push_str(&format!(
            "## Plan: {} ({} to {})\n",
            plan.name, plan.start_date, plan.end_date
        ));
        if let Some(description) = plan.description.as_deref().filter(|d| !d.trim().is_empty()) {
            prompt.push_str(&format!("Description: {}\n", description.trim()));
        }
        prompt.push_str(&format!(
            "Assignments: {} total, {} completed, {} in progress, {} pending, {} cancelled. Completion: {}\n",
            progress.totals.total,
            progress.totals.completed,
            progress.totals.in_progress,
            progress.totals.pending,
            progress.totals.cancelled,
            percent(progress.completion_rate),
        ));

        if progress.stages.is_empty() {
            prompt.push_str("No stages defined yet.\n");
        }
        for stage in &progress.stages {
            prompt.push_str(&format!(
                "- Stage {} \"{}\" ({} to {}): {} assignments, {} completed, {} pending, completion {}\n",
                stage.order,
                stage.name,
                stage.start_date,
                stage.end_date,
                stage.counts.total,
                stage.counts.completed,
                stage.counts.pending,
                percent(stage.completion_rate),
            ));
        }
        prompt.push('\n');
    }

    push_instructions(&mut prompt, instructions);
    prompt
}

/// 教师个人工作报告草稿，`stage_names` 为阶段 ID 到名称的映射
pub fn build_draft_prompt(
    author: &User,
    assignments: &[Assignment],
    stage_names: &HashMap<i64, String>,
    instructions: Option<&str>,
) -> String {
    let mut prompt = String::new();
    prompt.push_str(&format!(
        "Draft a work report for {} to submit to the head of the admissions committee. \
         Describe what was completed, what is still in progress and any blockers.\n",
        author.profile.full_name
    ));
    prompt.push_str(REPORT_LANGUAGE_HINT);
    prompt.push_str("\n\n## Assignments\n");

    if assignments.is_empty() {
        prompt.push_str("No assignments recorded.\n");
    }

    for assignment in assignments {
        let stage = stage_names
            .get(&assignment.stage_id)
            .map(String::as_str)
            .unwrap_or("unknown stage");
        prompt.push_str(&format!(
            "- [{}] {} (stage: {}",
            assignment.status, assignment.title, stage
        ));
        if let Some(due_date) = assignment.due_date {
            prompt.push_str(&format!(", due {due_date}"));
        }
        prompt.push(')');
        if let Some(description) = assignment
            .description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
        {
            prompt.push_str(&format!(": {}", description.trim()));
        }
        prompt.push('\n');
    }

    push_instructions(&mut prompt, instructions);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::entities::AssignmentStatus;
    use crate::models::plans::entities::{EnrollmentPlan, StageProgress, StatusCounts};
    use crate::models::users::entities::{UserProfile, UserRole, UserStatus};
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn progress() -> PlanProgress {
        let counts = StatusCounts {
            total: 4,
            pending: 1,
            in_progress: 1,
            completed: 2,
            cancelled: 0,
        };
        PlanProgress {
            plan: EnrollmentPlan {
                id: 1,
                name: "Tuyển sinh đại học 2025".to_string(),
                description: Some("Đợt 1".to_string()),
                start_date: d("2025-03-01"),
                end_date: d("2025-09-30"),
                created_by: 1,
                created_at: chrono::Utc::now(),
                updated_at: chrono::Utc::now(),
            },
            stages: vec![StageProgress {
                stage_id: 3,
                name: "Nhận hồ sơ".to_string(),
                order: 1,
                start_date: d("2025-03-01"),
                end_date: d("2025-04-30"),
                completion_rate: 0.5,
                counts: counts.clone(),
            }],
            totals: counts,
            completion_rate: 0.5,
        }
    }

    fn teacher() -> User {
        User {
            id: 2,
            email: "gv@utc2.edu.vn".to_string(),
            password_hash: String::new(),
            role: UserRole::Teacher,
            status: UserStatus::Active,
            profile: UserProfile {
                full_name: "Nguyễn Văn A".to_string(),
                ..Default::default()
            },
            last_login: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_plans_prompt_contains_plan_and_stage_figures() {
        let prompt = build_plans_prompt(&[progress()], Some("  Focus on stage 1  "));
        assert!(prompt.contains("## Plan: Tuyển sinh đại học 2025 (2025-03-01 to 2025-09-30)"));
        assert!(prompt.contains("Description: Đợt 1"));
        assert!(prompt.contains("Stage 1 \"Nhận hồ sơ\""));
        assert!(prompt.contains("Completion: 50%"));
        assert!(prompt.contains("## Additional instructions\nFocus on stage 1\n"));
    }

    #[test]
    fn test_plans_prompt_without_plans_or_instructions() {
        let prompt = build_plans_prompt(&[], Some("   "));
        assert!(prompt.contains("no enrollment plans"));
        assert!(!prompt.contains("Additional instructions"));
    }

    #[test]
    fn test_draft_prompt_lists_assignments() {
        let assignment = Assignment {
            id: 9,
            stage_id: 3,
            assignee_id: 2,
            title: "Tư vấn tại THPT Lê Quý Đôn".to_string(),
            description: Some("Buổi sáng".to_string()),
            status: AssignmentStatus::InProgress,
            due_date: Some(d("2025-04-15")),
            created_by: 1,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let stage_names = HashMap::from([(3, "Nhận hồ sơ".to_string())]);

        let prompt = build_draft_prompt(&teacher(), &[assignment], &stage_names, None);
        assert!(prompt.contains("Nguyễn Văn A"));
        assert!(prompt.contains(
            "- [in_progress] Tư vấn tại THPT Lê Quý Đôn (stage: Nhận hồ sơ, due 2025-04-15): Buổi sáng"
        ));
    }
}
