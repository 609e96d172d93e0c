#[macro_use]
mod common;

use actix_web::test;
use serde_json::json;

use common::*;
use utc2_admission_portal::models::reports::entities::ReportStatus;
use utc2_admission_portal::models::reports::requests::CreateReportRequest;
use utc2_admission_portal::storage::{ReviewOutcome, Storage};

// 建立计划与阶段，返回阶段 ID
macro_rules! seed_stage {
    ($app:expr, $admin:expr) => {{
        let resp = test::call_service(
            $app,
            post(
                "/api/plans",
                $admin,
                json!({"name": "Tuyển sinh 2025", "start_date": "2025-01-01", "end_date": "2025-12-31"}),
            )
            .to_request(),
        )
        .await;
        let plan_id = body_json(resp).await["data"]["id"].as_i64().unwrap();
        let resp = test::call_service(
            $app,
            post(
                &format!("/api/plans/{plan_id}/stages"),
                $admin,
                json!({"name": "Tư vấn", "order": 1, "start_date": "2025-03-01", "end_date": "2025-03-31"}),
            )
            .to_request(),
        )
        .await;
        (plan_id, body_json(resp).await["data"]["id"].as_i64().unwrap())
    }};
}

#[actix_web::test]
async fn test_assignment_visibility_and_status_updates() {
    let env = setup().await;
    let app = init_app!(env);
    let admin = login!(&app, ADMIN_EMAIL, ADMIN_PASSWORD);
    let teacher = login!(&app, TEACHER_EMAIL, TEACHER_PASSWORD);
    let other = login!(&app, OTHER_TEACHER_EMAIL, TEACHER_PASSWORD);
    let (_, stage_id) = seed_stage!(&app, &admin);

    // 截止日期必须落在阶段内
    let resp = test::call_service(
        &app,
        post(
            "/api/assignments",
            &admin,
            json!({"stage_id": stage_id, "assignee_id": env.teacher_id, "title": "Tư vấn", "due_date": "2025-05-01"}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    assert_eq!(body_json(resp).await["code"], 4202);

    let resp = test::call_service(
        &app,
        post(
            "/api/assignments",
            &teacher,
            json!({"stage_id": stage_id, "assignee_id": env.teacher_id, "title": "Tự giao"}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 403);

    let mut ids = Vec::new();
    for assignee in [env.teacher_id, env.other_teacher_id] {
        let resp = test::call_service(
            &app,
            post(
                "/api/assignments",
                &admin,
                json!({"stage_id": stage_id, "assignee_id": assignee, "title": "Tư vấn trường THPT", "due_date": "2025-03-20"}),
            )
            .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 201);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["status"], "pending");
        ids.push(body["data"]["id"].as_i64().unwrap());
    }

    // 教师只看到自己的任务，即使请求了别人的 assignee_id
    let resp = test::call_service(
        &app,
        get(
            &format!("/api/assignments?assignee_id={}", env.other_teacher_id),
            &teacher,
        )
        .to_request(),
    )
    .await;
    let items = body_json(resp).await["data"]["items"].clone();
    assert_eq!(items.as_array().unwrap().len(), 1);
    assert_eq!(items[0]["assignee_id"], env.teacher_id);

    let resp = test::call_service(&app, get("/api/assignments", &admin).to_request()).await;
    assert_eq!(body_json(resp).await["data"]["pagination"]["total"], 2);

    let resp = test::call_service(&app, get(&format!("/api/assignments/{}", ids[1]), &teacher).to_request()).await;
    assert_eq!(resp.status(), 403);

    let resp = test::call_service(
        &app,
        put(&format!("/api/assignments/{}", ids[0]), &teacher, json!({"status": "in_progress"})).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    assert_eq!(body_json(resp).await["data"]["status"], "in_progress");

    let resp = test::call_service(
        &app,
        put(&format!("/api/assignments/{}", ids[0]), &teacher, json!({"title": "Đổi tên"})).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 403);

    let resp = test::call_service(
        &app,
        put(&format!("/api/assignments/{}", ids[0]), &teacher, json!({"status": "cancelled"})).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 403);
    assert_eq!(body_json(resp).await["code"], 4201);

    let resp = test::call_service(
        &app,
        put(&format!("/api/assignments/{}", ids[0]), &other, json!({"status": "completed"})).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 403);

    let resp = test::call_service(
        &app,
        put(
            &format!("/api/assignments/{}", ids[0]),
            &admin,
            json!({"status": "cancelled", "assignee_id": env.other_teacher_id}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["status"], "cancelled");
    assert_eq!(body["data"]["assignee_id"], env.other_teacher_id);

    let resp = test::call_service(&app, delete(&format!("/api/assignments/{}", ids[1]), &teacher).to_request()).await;
    assert_eq!(resp.status(), 403);
    let resp = test::call_service(&app, delete(&format!("/api/assignments/{}", ids[1]), &admin).to_request()).await;
    assert_eq!(resp.status(), 200);
}

#[actix_web::test]
async fn test_assignment_requires_active_assignee() {
    let env = setup().await;
    let app = init_app!(env);
    let admin = login!(&app, ADMIN_EMAIL, ADMIN_PASSWORD);
    let (_, stage_id) = seed_stage!(&app, &admin);

    let resp = test::call_service(
        &app,
        put(
            &format!("/api/users/{}", env.other_teacher_id),
            &admin,
            json!({"status": "inactive"}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);

    let resp = test::call_service(
        &app,
        post(
            "/api/assignments",
            &admin,
            json!({"stage_id": stage_id, "assignee_id": env.other_teacher_id, "title": "Tư vấn"}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    assert_eq!(body_json(resp).await["code"], 2003);

    let resp = test::call_service(
        &app,
        post(
            "/api/assignments",
            &admin,
            json!({"stage_id": stage_id, "assignee_id": 999, "title": "Tư vấn"}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 404);
    assert_eq!(body_json(resp).await["code"], 3000);
}

#[actix_web::test]
async fn test_report_lifecycle() {
    let env = setup().await;
    let app = init_app!(env);
    let admin = login!(&app, ADMIN_EMAIL, ADMIN_PASSWORD);
    let teacher = login!(&app, TEACHER_EMAIL, TEACHER_PASSWORD);
    let other = login!(&app, OTHER_TEACHER_EMAIL, TEACHER_PASSWORD);
    let (plan_id, _) = seed_stage!(&app, &admin);

    let resp = test::call_service(
        &app,
        post(
            "/api/reports",
            &teacher,
            json!({"title": "Báo cáo tuần 1", "content": "# Kết quả\nĐã tư vấn 3 trường.", "plan_id": plan_id}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["status"], "submitted");
    assert_eq!(body["data"]["author_id"], env.teacher_id);
    let report_id = body["data"]["id"].as_i64().unwrap();

    let resp = test::call_service(
        &app,
        post("/api/reports", &teacher, json!({"title": "x", "content": "y", "plan_id": 999})).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 404);

    let resp = test::call_service(&app, get(&format!("/api/reports/{report_id}"), &other).to_request()).await;
    assert_eq!(resp.status(), 403);

    let resp = test::call_service(&app, get("/api/reports", &other).to_request()).await;
    assert_eq!(body_json(resp).await["data"]["pagination"]["total"], 0);
    let resp = test::call_service(&app, get("/api/reports", &admin).to_request()).await;
    assert_eq!(body_json(resp).await["data"]["pagination"]["total"], 1);

    let review_uri = format!("/api/reports/{report_id}/review");
    let resp = test::call_service(&app, put(&review_uri, &teacher, json!({"status": "reviewed"})).to_request()).await;
    assert_eq!(resp.status(), 403);

    let resp = test::call_service(&app, put(&review_uri, &admin, json!({"status": "submitted"})).to_request()).await;
    assert_eq!(resp.status(), 400);
    assert_eq!(body_json(resp).await["code"], 5001);

    let resp = test::call_service(
        &app,
        put(&review_uri, &admin, json!({"status": "reviewed", "review_note": "  Tốt  "})).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["status"], "reviewed");
    assert_eq!(body["data"]["review_note"], "Tốt");
    assert_eq!(body["data"]["reviewed_by"], env.admin_id);

    let resp = test::call_service(&app, put(&review_uri, &admin, json!({"status": "rejected"})).to_request()).await;
    assert_eq!(resp.status(), 409);
    assert_eq!(body_json(resp).await["code"], 5002);

    // 已审阅的报告作者不能删除
    let resp = test::call_service(&app, delete(&format!("/api/reports/{report_id}"), &teacher).to_request()).await;
    assert_eq!(resp.status(), 403);
    let resp = test::call_service(&app, delete(&format!("/api/reports/{report_id}"), &admin).to_request()).await;
    assert_eq!(resp.status(), 200);
}

#[actix_web::test]
async fn test_author_deletes_submitted_report() {
    let env = setup().await;
    let app = init_app!(env);
    let teacher = login!(&app, TEACHER_EMAIL, TEACHER_PASSWORD);

    let resp = test::call_service(
        &app,
        post("/api/reports", &teacher, json!({"title": "Nháp", "content": "Nội dung"})).to_request(),
    )
    .await;
    let report_id = body_json(resp).await["data"]["id"].as_i64().unwrap();

    let resp = test::call_service(&app, delete(&format!("/api/reports/{report_id}"), &teacher).to_request()).await;
    assert_eq!(resp.status(), 200);
    let resp = test::call_service(&app, get(&format!("/api/reports/{report_id}"), &teacher).to_request()).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_concurrent_reviews_apply_once() {
    let env = setup().await;
    let storage = env.ctx.storage.clone();
    let report = storage
        .create_report(
            CreateReportRequest {
                title: "Báo cáo tuần".to_string(),
                content: "Nội dung".to_string(),
                plan_id: None,
            },
            env.teacher_id,
        )
        .await
        .unwrap();

    let (first, second) = tokio::join!(
        storage.review_report(report.id, ReportStatus::Reviewed, Some("Đạt".to_string()), env.admin_id),
        storage.review_report(report.id, ReportStatus::Reviewed, None, env.admin_id),
    );
    let outcomes = [first.unwrap(), second.unwrap()];
    let applied = outcomes.iter().filter(|o| matches!(o, ReviewOutcome::Reviewed(_))).count();
    let refused = outcomes.iter().filter(|o| matches!(o, ReviewOutcome::AlreadyReviewed)).count();
    assert_eq!((applied, refused), (1, 1));

    // 绕过服务层的检查，存储层也不会覆盖终态
    let again = storage
        .review_report(report.id, ReportStatus::Rejected, None, env.admin_id)
        .await
        .unwrap();
    assert!(matches!(again, ReviewOutcome::AlreadyReviewed));
    let kept = storage.get_report_by_id(report.id).await.unwrap().unwrap();
    assert_eq!(kept.status, ReportStatus::Reviewed);

    let missing = storage
        .review_report(999_999, ReportStatus::Reviewed, None, env.admin_id)
        .await
        .unwrap();
    assert!(matches!(missing, ReviewOutcome::NotFound));
}

#[actix_web::test]
async fn test_user_management_is_admin_only() {
    let env = setup().await;
    let app = init_app!(env);
    let admin = login!(&app, ADMIN_EMAIL, ADMIN_PASSWORD);
    let teacher = login!(&app, TEACHER_EMAIL, TEACHER_PASSWORD);

    let resp = test::call_service(&app, get("/api/users", &teacher).to_request()).await;
    assert_eq!(resp.status(), 403);

    let new_user = json!({
        "email": "gv3@utc2.edu.vn",
        "password": "Welcome123!",
        "role": "GIAOVIEN",
        "full_name": "Giáo viên C"
    });
    let resp = test::call_service(&app, post("/api/users", &admin, new_user.clone()).to_request()).await;
    assert_eq!(resp.status(), 201);
    let new_id = body_json(resp).await["data"]["user"]["id"].as_i64().unwrap();

    let resp = test::call_service(&app, post("/api/users", &admin, new_user).to_request()).await;
    assert_eq!(resp.status(), 409);
    assert_eq!(body_json(resp).await["code"], 3001);

    let resp = test::call_service(
        &app,
        post(
            "/api/users",
            &admin,
            json!({"email": "weak@utc2.edu.vn", "password": "short", "role": "GIAOVIEN", "full_name": "Yếu"}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);

    let resp = test::call_service(&app, delete(&format!("/api/users/{}", env.admin_id), &admin).to_request()).await;
    assert_eq!(resp.status(), 400);
    assert_eq!(body_json(resp).await["code"], 3007);

    let resp = test::call_service(&app, delete(&format!("/api/users/{new_id}"), &admin).to_request()).await;
    assert_eq!(resp.status(), 200);
    let resp = test::call_service(&app, login_request("gv3@utc2.edu.vn", "Welcome123!").to_request()).await;
    assert_eq!(resp.status(), 401);
}
