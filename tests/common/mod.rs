#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::test;
use serde_json::Value;
use tempfile::TempDir;

use utc2_admission_portal::cache::object_cache::moka::MokaCacheWrapper;
use utc2_admission_portal::config::{AiConfig, VideoConfig};
use utc2_admission_portal::integrations::{GeminiClient, HmsVideoClient};
use utc2_admission_portal::models::users::entities::UserRole;
use utc2_admission_portal::models::users::requests::CreateUserRequest;
use utc2_admission_portal::runtime::lifetime::startup::StartupContext;
use utc2_admission_portal::storage::{LocalBlobStore, Storage, create_storage_with_url};
use utc2_admission_portal::utils::password::hash_password;

pub const ADMIN_EMAIL: &str = "truongban@utc2.edu.vn";
pub const ADMIN_PASSWORD: &str = "Admin123!";
pub const TEACHER_EMAIL: &str = "giaovien@utc2.edu.vn";
pub const TEACHER_PASSWORD: &str = "Teacher123!";
pub const OTHER_TEACHER_EMAIL: &str = "giaovien2@utc2.edu.vn";

pub struct TestEnv {
    pub ctx: StartupContext,
    pub admin_id: i64,
    pub teacher_id: i64,
    pub other_teacher_id: i64,
    _dir: TempDir,
}

pub fn ai_config(endpoint: &str, api_key: &str) -> AiConfig {
    AiConfig {
        endpoint: endpoint.to_string(),
        api_key: api_key.to_string(),
        model: "gemini-test".to_string(),
        timeout_secs: 5,
    }
}

pub fn video_config(endpoint: &str, access_key: &str) -> VideoConfig {
    VideoConfig {
        endpoint: endpoint.to_string(),
        access_key: access_key.to_string(),
        app_secret: "video-secret".to_string(),
        template_id: String::new(),
        timeout_secs: 5,
        token_ttl: 300,
    }
}

/// 未配置外部服务的环境
pub async fn setup() -> TestEnv {
    setup_with(
        ai_config("http://127.0.0.1:9", ""),
        video_config("http://127.0.0.1:9", ""),
    )
    .await
}

pub async fn setup_with(ai: AiConfig, video: VideoConfig) -> TestEnv {
    let dir = TempDir::new().unwrap();
    let url = format!(
        "sqlite://{}?mode=rwc",
        dir.path().join("portal.db").display()
    );
    let storage = create_storage_with_url(&url).await.unwrap();
    let blobs = LocalBlobStore::new(dir.path().join("blobs")).await.unwrap();

    let mut ids = Vec::new();
    for (email, password, role, name) in [
        (ADMIN_EMAIL, ADMIN_PASSWORD, UserRole::TruongBan, "Trưởng ban"),
        (TEACHER_EMAIL, TEACHER_PASSWORD, UserRole::Teacher, "Giáo viên A"),
        (OTHER_TEACHER_EMAIL, TEACHER_PASSWORD, UserRole::Teacher, "Giáo viên B"),
    ] {
        let user = storage
            .create_user(CreateUserRequest {
                email: email.to_string(),
                password: hash_password(password).unwrap(),
                role,
                full_name: name.to_string(),
                phone: None,
                department: None,
                avatar_url: None,
            })
            .await
            .unwrap();
        ids.push(user.id);
    }

    TestEnv {
        ctx: StartupContext {
            storage,
            cache: Arc::new(MokaCacheWrapper::default()),
            blobs: Arc::new(blobs),
            generator: Arc::new(GeminiClient::new(&ai).unwrap()),
            video: Arc::new(HmsVideoClient::new(&video).unwrap()),
        },
        admin_id: ids[0],
        teacher_id: ids[1],
        other_teacher_id: ids[2],
        _dir: dir,
    }
}

/// 组装与生产一致的 App
#[macro_export]
macro_rules! init_app {
    ($env:expr) => {{
        let ctx = $env.ctx.clone();
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(
                    actix_web::web::JsonConfig::default()
                        .limit(20 * 1024 * 1024)
                        .error_handler(utc2_admission_portal::utils::json_error_handler),
                )
                .app_data(
                    actix_web::web::QueryConfig::default()
                        .error_handler(utc2_admission_portal::utils::query_error_handler),
                )
                .configure(move |cfg| ctx.configure(cfg)),
        )
        .await
    }};
}

/// 登录接口按 IP 限流，每次登录使用不同的来源地址
pub fn next_client_ip() -> String {
    static COUNTER: AtomicU32 = AtomicU32::new(1);
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("10.{}.{}.{}", (n >> 16) & 0xff, (n >> 8) & 0xff, n & 0xff)
}

pub fn login_request(email: &str, password: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/auth/login")
        .insert_header(("X-Forwarded-For", next_client_ip()))
        .set_json(serde_json::json!({ "email": email, "password": password }))
}

pub async fn body_json<B: MessageBody>(resp: ServiceResponse<B>) -> Value {
    test::read_body_json(resp).await
}

pub async fn access_token<B: MessageBody>(resp: ServiceResponse<B>) -> String {
    assert_eq!(resp.status(), 200);
    let body = body_json(resp).await;
    body["data"]["access_token"].as_str().unwrap().to_string()
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

pub fn get(uri: &str, token: &str) -> test::TestRequest {
    test::TestRequest::get().uri(uri).insert_header(bearer(token))
}

pub fn post(uri: &str, token: &str, body: Value) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .insert_header(bearer(token))
        .set_json(body)
}

pub fn put(uri: &str, token: &str, body: Value) -> test::TestRequest {
    test::TestRequest::put()
        .uri(uri)
        .insert_header(bearer(token))
        .set_json(body)
}

pub fn delete(uri: &str, token: &str) -> test::TestRequest {
    test::TestRequest::delete().uri(uri).insert_header(bearer(token))
}

/// 登录并返回访问令牌
#[macro_export]
macro_rules! login {
    ($app:expr, $email:expr, $password:expr) => {
        $crate::common::access_token(
            actix_web::test::call_service(
                $app,
                $crate::common::login_request($email, $password).to_request(),
            )
            .await,
        )
        .await
    };
}
