#[macro_use]
mod common;

use actix_web::test;
use serde_json::json;
use wiremock::matchers::{header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::*;

fn gemini_reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{"content": {"parts": [{"text": text}]}}]
    }))
}

#[actix_web::test]
async fn test_generate_plan_report() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-test:generateContent"))
        .and(query_param("key", "test-key"))
        .respond_with(gemini_reply("# Báo cáo tổng hợp\nTiến độ tốt."))
        .expect(1)
        .mount(&server)
        .await;

    let env = setup_with(
        ai_config(&server.uri(), "test-key"),
        video_config(&server.uri(), ""),
    )
    .await;
    let app = init_app!(env);
    let admin = login!(&app, ADMIN_EMAIL, ADMIN_PASSWORD);
    let teacher = login!(&app, TEACHER_EMAIL, TEACHER_PASSWORD);

    let resp = test::call_service(
        &app,
        post(
            "/api/plans",
            &admin,
            json!({"name": "Tuyển sinh 2025", "start_date": "2025-01-01", "end_date": "2025-12-31"}),
        )
        .to_request(),
    )
    .await;
    let plan_id = body_json(resp).await["data"]["id"].as_i64().unwrap();

    let resp = test::call_service(&app, post("/api/reports/plans", &teacher, json!({})).to_request()).await;
    assert_eq!(resp.status(), 403);

    let resp = test::call_service(
        &app,
        post("/api/reports/plans", &admin, json!({"plan_ids": [plan_id, 999]})).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 404);

    let resp = test::call_service(
        &app,
        post("/api/reports/plans", &admin, json!({"plan_ids": [plan_id], "instructions": "Ngắn gọn"})).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    assert_eq!(
        body_json(resp).await["data"]["report"],
        "# Báo cáo tổng hợp\nTiến độ tốt."
    );
}

#[actix_web::test]
async fn test_draft_report_upstream_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-test:generateContent"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let env = setup_with(
        ai_config(&server.uri(), "test-key"),
        video_config(&server.uri(), ""),
    )
    .await;
    let app = init_app!(env);
    let teacher = login!(&app, TEACHER_EMAIL, TEACHER_PASSWORD);

    let resp = test::call_service(&app, post("/api/reports/draft", &teacher, json!({})).to_request()).await;
    assert_eq!(resp.status(), 502);
    assert_eq!(body_json(resp).await["code"], 7000);
}

#[actix_web::test]
async fn test_ai_not_configured() {
    let env = setup().await;
    let app = init_app!(env);
    let teacher = login!(&app, TEACHER_EMAIL, TEACHER_PASSWORD);

    let resp = test::call_service(&app, post("/api/reports/draft", &teacher, json!({})).to_request()).await;
    assert_eq!(resp.status(), 503);
    assert_eq!(body_json(resp).await["code"], 7002);
}

#[actix_web::test]
async fn test_create_video_room() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rooms"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "room-123",
            "name": "Tư vấn tuyển sinh",
            "enabled": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let env = setup_with(
        ai_config(&server.uri(), ""),
        video_config(&server.uri(), "access-key"),
    )
    .await;
    let app = init_app!(env);
    let teacher = login!(&app, TEACHER_EMAIL, TEACHER_PASSWORD);

    let resp = test::call_service(
        &app,
        post("/api/video/rooms", &teacher, json!({"name": "Tư vấn tuyển sinh"})).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["room"]["room_id"], "room-123");
    assert_eq!(body["data"]["room"]["enabled"], true);
}

#[actix_web::test]
async fn test_video_not_configured() {
    let env = setup().await;
    let app = init_app!(env);
    let teacher = login!(&app, TEACHER_EMAIL, TEACHER_PASSWORD);

    let resp = test::call_service(&app, post("/api/video/rooms", &teacher, json!({})).to_request()).await;
    assert_eq!(resp.status(), 503);

    let req = test::TestRequest::post()
        .uri("/api/video/rooms")
        .set_json(json!({}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 401);
}
