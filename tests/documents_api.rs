#[macro_use]
mod common;

use actix_web::test;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::json;

use common::*;

const PDF_BYTES: &[u8] = b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog >>\nendobj\n%%EOF\n";

// 签名链接去掉外部地址，得到可直接请求的路径
fn local_path(url: &str) -> String {
    let start = url.find("/api/").unwrap();
    url[start..].to_string()
}

#[actix_web::test]
async fn test_upload_and_signed_download() {
    let env = setup().await;
    let app = init_app!(env);
    let admin = login!(&app, ADMIN_EMAIL, ADMIN_PASSWORD);
    let teacher = login!(&app, TEACHER_EMAIL, TEACHER_PASSWORD);

    let upload = json!({
        "fileName": "Thông báo tuyển sinh.pdf",
        "fileType": "application/pdf",
        "content": format!("data:application/pdf;base64,{}", STANDARD.encode(PDF_BYTES)),
        "description": "Thông báo chính thức"
    });

    let resp = test::call_service(&app, post("/api/documents/upload", &teacher, upload.clone()).to_request()).await;
    assert_eq!(resp.status(), 403);

    let resp = test::call_service(&app, post("/api/documents/upload", &admin, upload).to_request()).await;
    assert_eq!(resp.status(), 201);
    let body = body_json(resp).await;
    let document_id = body["data"]["document"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["document"]["file_size"], PDF_BYTES.len());
    assert!(body["data"]["document"].get("storage_key").is_none());
    assert_eq!(body["data"]["expires_in"], 900);

    let resp = test::call_service(&app, get("/api/documents", &teacher).to_request()).await;
    assert_eq!(body_json(resp).await["data"]["pagination"]["total"], 1);

    let resp = test::call_service(
        &app,
        get(&format!("/api/documents/{document_id}/url"), &teacher).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let url = body_json(resp).await["data"]["url"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(url.starts_with("http://127.0.0.1:8080/api/documents/"));

    // 下载不需要登录
    let req = test::TestRequest::get().uri(&local_path(&url)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers().get("content-type").unwrap(), "application/pdf");
    let disposition = resp
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains("filename*=UTF-8''"));
    let bytes = test::read_body(resp).await;
    assert_eq!(bytes.as_ref(), PDF_BYTES);

    let req = test::TestRequest::get()
        .uri(&format!("/api/documents/{document_id}/download?token=forged"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);
    assert_eq!(body_json(resp).await["code"], 6005);

    let resp = test::call_service(&app, delete(&format!("/api/documents/{document_id}"), &teacher).to_request()).await;
    assert_eq!(resp.status(), 403);
    let resp = test::call_service(&app, delete(&format!("/api/documents/{document_id}"), &admin).to_request()).await;
    assert_eq!(resp.status(), 200);

    let req = test::TestRequest::get().uri(&local_path(&url)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
}

#[actix_web::test]
async fn test_link_bound_to_document() {
    let env = setup().await;
    let app = init_app!(env);
    let admin = login!(&app, ADMIN_EMAIL, ADMIN_PASSWORD);

    let mut ids = Vec::new();
    for name in ["a.txt", "b.txt"] {
        let resp = test::call_service(
            &app,
            post(
                "/api/documents/upload",
                &admin,
                json!({"fileName": name, "fileType": "text/plain", "content": STANDARD.encode("xin chào")}),
            )
            .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 201);
        let body = body_json(resp).await;
        ids.push((
            body["data"]["document"]["id"].as_i64().unwrap(),
            body["data"]["url"].as_str().unwrap().to_string(),
        ));
    }

    let token = ids[0].1.split("token=").nth(1).unwrap().to_string();
    let req = test::TestRequest::get()
        .uri(&format!("/api/documents/{}/download?token={token}", ids[1].0))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);
}

#[actix_web::test]
async fn test_upload_validation() {
    let env = setup().await;
    let app = init_app!(env);
    let admin = login!(&app, ADMIN_EMAIL, ADMIN_PASSWORD);

    let resp = test::call_service(
        &app,
        post(
            "/api/documents/upload",
            &admin,
            json!({"fileName": "setup.exe", "fileType": "application/octet-stream", "content": STANDARD.encode(b"MZ")}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    assert_eq!(body_json(resp).await["code"], 6001);

    // 扩展名与内容不符
    let resp = test::call_service(
        &app,
        post(
            "/api/documents/upload",
            &admin,
            json!({"fileName": "fake.pdf", "fileType": "application/pdf", "content": STANDARD.encode(b"not a pdf")}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    assert_eq!(body_json(resp).await["code"], 6003);

    let resp = test::call_service(
        &app,
        post(
            "/api/documents/upload",
            &admin,
            json!({"fileName": "broken.pdf", "fileType": "application/pdf", "content": "%%%not-base64%%%"}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    assert_eq!(body_json(resp).await["code"], 6003);

    // 文本类型必须是 UTF-8 文本
    let resp = test::call_service(
        &app,
        post(
            "/api/documents/upload",
            &admin,
            json!({"fileName": "diem.csv", "fileType": "text/csv", "content": STANDARD.encode([0x4Du8, 0x5A, 0x90, 0x00, 0xFF])}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    assert_eq!(body_json(resp).await["code"], 6003);

    let resp = test::call_service(&app, get("/api/documents", &admin).to_request()).await;
    assert_eq!(body_json(resp).await["data"]["pagination"]["total"], 0);
}
