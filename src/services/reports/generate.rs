use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::{BTreeSet, HashMap};
use tracing::{error, info};

use super::ReportService;
use super::prompt::{build_draft_prompt, build_plans_prompt};
use crate::integrations::TextGenerator;
use crate::models::reports::requests::{DraftReportRequest, GeneratePlanReportRequest};
use crate::models::reports::responses::GeneratedReportResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::plans::progress::load_plan_progress;
use crate::services::{current_user, internal_error, not_found};

fn not_configured() -> HttpResponse {
    HttpResponse::ServiceUnavailable().json(ApiResponse::error_empty(
        ErrorCode::ServiceNotConfigured,
        "AI report generation is not configured",
    ))
}

async fn run_generation(generator: &dyn TextGenerator, prompt: &str) -> HttpResponse {
    match generator.generate(prompt).await {
        Ok(report) => HttpResponse::Ok().json(ApiResponse::success(
            GeneratedReportResponse { report },
            "Report generated successfully",
        )),
        Err(e) => {
            error!("AI report generation failed: {}", e);
            HttpResponse::BadGateway().json(ApiResponse::error_empty(
                ErrorCode::AiServiceFailed,
                format!("AI report generation failed: {}", e.message()),
            ))
        }
    }
}

pub async fn generate_plan_report(
    service: &ReportService,
    generate_data: GeneratePlanReportRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let generator = service.get_generator(request)?;
    if !generator.is_configured() {
        return Ok(not_configured());
    }
    let storage = service.get_storage(request)?;

    // 空列表视为全部计划
    let requested = generate_data.plan_ids.filter(|ids| !ids.is_empty());

    let plans = match storage.list_plans_by_ids(requested.clone()).await {
        Ok(plans) => plans,
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::InternalServerError,
                "Failed to load plans",
                e,
            ));
        }
    };

    if let Some(ids) = requested {
        let missing: Vec<String> = ids
            .iter()
            .filter(|id| !plans.iter().any(|plan| plan.id == **id))
            .map(|id| id.to_string())
            .collect();
        if !missing.is_empty() {
            return Ok(not_found(
                ErrorCode::PlanNotFound,
                format!("Plans not found: {}", missing.join(", ")),
            ));
        }
    }

    let mut progresses = Vec::with_capacity(plans.len());
    for plan in plans {
        match load_plan_progress(storage.as_ref(), plan).await {
            Ok(progress) => progresses.push(progress),
            Err(e) => {
                return Ok(internal_error(
                    ErrorCode::InternalServerError,
                    "Failed to compute plan progress",
                    e,
                ));
            }
        }
    }

    let prompt = build_plans_prompt(&progresses, generate_data.instructions.as_deref());
    info!(
        "Generating plan report for {} plan(s), prompt length {}",
        progresses.len(),
        prompt.len()
    );

    Ok(run_generation(generator.as_ref(), &prompt).await)
}

pub async fn draft_report(
    service: &ReportService,
    draft_data: DraftReportRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let generator = service.get_generator(request)?;
    if !generator.is_configured() {
        return Ok(not_configured());
    }
    let storage = service.get_storage(request)?;

    if let Some(plan_id) = draft_data.plan_id {
        match storage.get_plan_by_id(plan_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Ok(not_found(ErrorCode::PlanNotFound, "Plan not found")),
            Err(e) => {
                return Ok(internal_error(
                    ErrorCode::InternalServerError,
                    "Failed to get plan",
                    e,
                ));
            }
        }
    }

    let assignments = match storage
        .list_assignments_for_user(user.id, draft_data.plan_id)
        .await
    {
        Ok(assignments) => assignments,
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::InternalServerError,
                "Failed to load assignments",
                e,
            ));
        }
    };

    let stage_ids: BTreeSet<i64> = assignments.iter().map(|a| a.stage_id).collect();
    let mut stage_names = HashMap::with_capacity(stage_ids.len());
    for stage_id in stage_ids {
        match storage.get_stage_by_id(stage_id).await {
            Ok(Some(stage)) => {
                stage_names.insert(stage_id, stage.name);
            }
            Ok(None) => {}
            Err(e) => {
                return Ok(internal_error(
                    ErrorCode::InternalServerError,
                    "Failed to load stages",
                    e,
                ));
            }
        }
    }

    let prompt = build_draft_prompt(
        &user,
        &assignments,
        &stage_names,
        draft_data.instructions.as_deref(),
    );
    info!(
        "Drafting report for user {} from {} assignment(s)",
        user.id,
        assignments.len()
    );

    Ok(run_generation(generator.as_ref(), &prompt).await)
}
