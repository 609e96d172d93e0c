#[macro_use]
mod common;

use actix_web::test;
use serde_json::{Value, json};

use common::*;

fn plan_body() -> Value {
    json!({
        "name": "Tuyển sinh 2025",
        "description": "Kế hoạch tuyển sinh đại học chính quy",
        "start_date": "2025-01-01",
        "end_date": "2025-12-31"
    })
}

#[actix_web::test]
async fn test_plan_crud_requires_admin_for_writes() {
    let env = setup().await;
    let app = init_app!(env);
    let admin = login!(&app, ADMIN_EMAIL, ADMIN_PASSWORD);
    let teacher = login!(&app, TEACHER_EMAIL, TEACHER_PASSWORD);

    let resp = test::call_service(&app, post("/api/plans", &teacher, plan_body()).to_request()).await;
    assert_eq!(resp.status(), 403);
    assert_eq!(body_json(resp).await["code"], 2002);

    let resp = test::call_service(&app, post("/api/plans", &admin, plan_body()).to_request()).await;
    assert_eq!(resp.status(), 201);
    let plan = body_json(resp).await["data"].clone();
    let plan_id = plan["id"].as_i64().unwrap();
    assert_eq!(plan["created_by"], env.admin_id);

    let resp = test::call_service(&app, get("/api/plans", &teacher).to_request()).await;
    assert_eq!(resp.status(), 200);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["pagination"]["total"], 1);

    let resp = test::call_service(
        &app,
        put(&format!("/api/plans/{plan_id}"), &teacher, json!({"name": "x"})).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 403);

    let resp = test::call_service(
        &app,
        put(
            &format!("/api/plans/{plan_id}"),
            &admin,
            json!({"name": "Tuyển sinh 2025 (đợt 1)"}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    assert_eq!(body_json(resp).await["data"]["name"], "Tuyển sinh 2025 (đợt 1)");

    let resp = test::call_service(&app, delete(&format!("/api/plans/{plan_id}"), &admin).to_request()).await;
    assert_eq!(resp.status(), 200);
    let resp = test::call_service(&app, get(&format!("/api/plans/{plan_id}"), &admin).to_request()).await;
    assert_eq!(resp.status(), 404);
    assert_eq!(body_json(resp).await["code"], 4000);
}

#[actix_web::test]
async fn test_plan_rejects_inverted_dates() {
    let env = setup().await;
    let app = init_app!(env);
    let admin = login!(&app, ADMIN_EMAIL, ADMIN_PASSWORD);

    let resp = test::call_service(
        &app,
        post(
            "/api/plans",
            &admin,
            json!({"name": "Sai ngày", "start_date": "2025-06-01", "end_date": "2025-05-01"}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    assert_eq!(body_json(resp).await["code"], 4001);
}

#[actix_web::test]
async fn test_invalid_path_id() {
    let env = setup().await;
    let app = init_app!(env);
    let admin = login!(&app, ADMIN_EMAIL, ADMIN_PASSWORD);

    for uri in ["/api/plans/abc", "/api/plans/0", "/api/plans/-3"] {
        let resp = test::call_service(&app, get(uri, &admin).to_request()).await;
        assert_eq!(resp.status(), 400, "{uri}");
    }
}

#[actix_web::test]
async fn test_stage_rules() {
    let env = setup().await;
    let app = init_app!(env);
    let admin = login!(&app, ADMIN_EMAIL, ADMIN_PASSWORD);
    let teacher = login!(&app, TEACHER_EMAIL, TEACHER_PASSWORD);

    let resp = test::call_service(&app, post("/api/plans", &admin, plan_body()).to_request()).await;
    let plan_id = body_json(resp).await["data"]["id"].as_i64().unwrap();
    let stages_uri = format!("/api/plans/{plan_id}/stages");

    // 超出计划日期范围
    let resp = test::call_service(
        &app,
        post(
            &stages_uri,
            &admin,
            json!({"name": "Xét tuyển", "order": 1, "start_date": "2024-12-01", "end_date": "2025-02-01"}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    assert_eq!(body_json(resp).await["code"], 4101);

    let resp = test::call_service(
        &app,
        post(
            &stages_uri,
            &teacher,
            json!({"name": "Xét tuyển", "order": 1, "start_date": "2025-03-01", "end_date": "2025-04-01"}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 403);

    let resp = test::call_service(
        &app,
        post(
            &stages_uri,
            &admin,
            json!({"name": "Nhận hồ sơ", "order": 1, "start_date": "2025-03-01", "end_date": "2025-04-01"}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let first_id = body_json(resp).await["data"]["id"].as_i64().unwrap();

    // 同一计划内顺序不可重复
    let resp = test::call_service(
        &app,
        post(
            &stages_uri,
            &admin,
            json!({"name": "Xét tuyển", "order": 1, "start_date": "2025-04-02", "end_date": "2025-05-01"}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 409);
    assert_eq!(body_json(resp).await["code"], 4102);

    let resp = test::call_service(
        &app,
        post(
            &stages_uri,
            &admin,
            json!({"name": "Xét tuyển", "order": 2, "start_date": "2025-04-02", "end_date": "2025-05-01"}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let second_id = body_json(resp).await["data"]["id"].as_i64().unwrap();

    let resp = test::call_service(
        &app,
        put(&format!("/api/stages/{second_id}"), &admin, json!({"order": 1})).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 409);

    // 保持自身顺序不算冲突
    let resp = test::call_service(
        &app,
        put(
            &format!("/api/stages/{first_id}"),
            &admin,
            json!({"order": 1, "name": "Nhận hồ sơ trực tuyến"}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);

    let resp = test::call_service(&app, get(&stages_uri, &teacher).to_request()).await;
    assert_eq!(resp.status(), 200);
    let items = body_json(resp).await["data"]["items"].clone();
    let orders: Vec<i64> = items
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["order"].as_i64().unwrap())
        .collect();
    assert_eq!(orders, vec![1, 2]);

    // 计划缩短后阶段将越界
    let resp = test::call_service(
        &app,
        put(
            &format!("/api/plans/{plan_id}"),
            &admin,
            json!({"end_date": "2025-04-15"}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    assert_eq!(body_json(resp).await["code"], 4001);

    let resp = test::call_service(&app, get(&format!("/api/plans/{plan_id}"), &teacher).to_request()).await;
    let detail = body_json(resp).await;
    assert_eq!(detail["data"]["stages"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn test_stage_for_missing_plan() {
    let env = setup().await;
    let app = init_app!(env);
    let admin = login!(&app, ADMIN_EMAIL, ADMIN_PASSWORD);

    let resp = test::call_service(
        &app,
        post(
            "/api/plans/999/stages",
            &admin,
            json!({"name": "x", "order": 1, "start_date": "2025-03-01", "end_date": "2025-04-01"}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 404);
    assert_eq!(body_json(resp).await["code"], 4000);
}

#[actix_web::test]
async fn test_stage_shrink_keeps_assignment_due_dates() {
    let env = setup().await;
    let app = init_app!(env);
    let admin = login!(&app, ADMIN_EMAIL, ADMIN_PASSWORD);

    let resp = test::call_service(&app, post("/api/plans", &admin, plan_body()).to_request()).await;
    let plan_id = body_json(resp).await["data"]["id"].as_i64().unwrap();
    let resp = test::call_service(
        &app,
        post(
            &format!("/api/plans/{plan_id}/stages"),
            &admin,
            json!({"name": "Nhận hồ sơ", "order": 1, "start_date": "2025-03-01", "end_date": "2025-06-30"}),
        )
        .to_request(),
    )
    .await;
    let stage_id = body_json(resp).await["data"]["id"].as_i64().unwrap();

    let resp = test::call_service(
        &app,
        post(
            "/api/assignments",
            &admin,
            json!({
                "stage_id": stage_id,
                "assignee_id": env.teacher_id,
                "title": "Tổng hợp hồ sơ",
                "due_date": "2025-06-15"
            }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);

    let stage_uri = format!("/api/stages/{stage_id}");
    let resp = test::call_service(&app, put(&stage_uri, &admin, json!({"end_date": "2025-04-30"})).to_request()).await;
    assert_eq!(resp.status(), 400);
    let body = body_json(resp).await;
    assert_eq!(body["code"], 4101);
    assert!(body["message"].as_str().unwrap().contains("Tổng hợp hồ sơ"));

    let resp = test::call_service(&app, put(&stage_uri, &admin, json!({"start_date": "2025-06-16"})).to_request()).await;
    assert_eq!(resp.status(), 400);

    // 仍覆盖截止日期的收缩可以通过
    let resp = test::call_service(
        &app,
        put(&stage_uri, &admin, json!({"start_date": "2025-04-01", "end_date": "2025-06-15"})).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["end_date"], "2025-06-15");
}

#[actix_web::test]
async fn test_progress_and_cascade_delete() {
    let env = setup().await;
    let app = init_app!(env);
    let admin = login!(&app, ADMIN_EMAIL, ADMIN_PASSWORD);

    let resp = test::call_service(&app, post("/api/plans", &admin, plan_body()).to_request()).await;
    let plan_id = body_json(resp).await["data"]["id"].as_i64().unwrap();
    let resp = test::call_service(
        &app,
        post(
            &format!("/api/plans/{plan_id}/stages"),
            &admin,
            json!({"name": "Nhận hồ sơ", "order": 1, "start_date": "2025-03-01", "end_date": "2025-04-01"}),
        )
        .to_request(),
    )
    .await;
    let stage_id = body_json(resp).await["data"]["id"].as_i64().unwrap();

    let mut assignment_ids = Vec::new();
    for (title, status) in [
        ("Tư vấn THPT A", "completed"),
        ("Tư vấn THPT B", "pending"),
        ("Tư vấn THPT C", "cancelled"),
    ] {
        let resp = test::call_service(
            &app,
            post(
                "/api/assignments",
                &admin,
                json!({
                    "stage_id": stage_id,
                    "assignee_id": env.teacher_id,
                    "title": title,
                    "status": status,
                    "due_date": "2025-03-15"
                }),
            )
            .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 201);
        assignment_ids.push(body_json(resp).await["data"]["id"].as_i64().unwrap());
    }

    let resp = test::call_service(
        &app,
        get(&format!("/api/plans/{plan_id}/progress"), &admin).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let progress = body_json(resp).await["data"].clone();
    assert_eq!(progress["totals"]["total"], 3);
    assert_eq!(progress["totals"]["completed"], 1);
    assert_eq!(progress["totals"]["cancelled"], 1);
    assert_eq!(progress["completion_rate"], 0.5);
    assert_eq!(progress["stages"][0]["stage_id"], stage_id);

    let resp = test::call_service(&app, delete(&format!("/api/plans/{plan_id}"), &admin).to_request()).await;
    assert_eq!(resp.status(), 200);

    let resp = test::call_service(&app, get(&format!("/api/stages/{stage_id}"), &admin).to_request()).await;
    assert_eq!(resp.status(), 404);
    for id in assignment_ids {
        let resp = test::call_service(&app, get(&format!("/api/assignments/{id}"), &admin).to_request()).await;
        assert_eq!(resp.status(), 404);
    }
}
