// HTTP API tests for UniSphere Match

use actix_web::{http::StatusCode, test, web, App};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use unisphere_match::core::{EligibilityGate, InMemoryCatalog, Recommender, GRADUATED_MENTOR_MESSAGE};
use unisphere_match::models::Candidate;
use unisphere_match::routes::{self, universities::AppState};
use unisphere_match::services::{
    CatalogBackend, DeepDiveCache, GeminiClient, LocalDocumentStore, VerificationService,
};

const REPORT: &str = r#"{"officialWebsite":"https://www.tum.de","infrastructure":"Garching research campus","departments":["Informatics","Mechanical Engineering"],"entranceExams":[{"name":"TestAS","details":"Recommended for bachelor applicants","applicationLink":"https://www.testas.de"}],"scholarships":[],"languageRequirements":["IELTS 6.5"],"professorHighlights":["Robotics and machine intelligence"]}"#;

fn upload_dir() -> PathBuf {
    std::env::temp_dir().join(format!("unisphere-api-{}", uuid::Uuid::new_v4()))
}

fn build_state(ai_endpoint: &str, upload_dir: PathBuf) -> AppState {
    let catalog = InMemoryCatalog::new(vec![
        Candidate::new("B", 600_000.0, &["law"], 50.0),
        Candidate::new("A", 450_000.0, &["data science", "AI"], 80.0),
    ]);

    let gemini = GeminiClient::new(
        ai_endpoint.to_string(),
        "test_key".to_string(),
        "gemini-test".to_string(),
        Duration::from_secs(5),
    )
    .unwrap();

    AppState {
        catalog: Arc::new(CatalogBackend::Memory(catalog)),
        recommender: Recommender::default(),
        deep_dive: Arc::new(DeepDiveCache::new(gemini, 10, 60)),
        verification: Arc::new(VerificationService::new(
            EligibilityGate::mentor(),
            LocalDocumentStore::new(upload_dir),
        )),
    }
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(routes::configure_extractors(1024 * 1024))
                .configure(routes::configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_health_reports_memory_catalog() {
    let app = init_app!(build_state("http://127.0.0.1:9", upload_dir()));

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
}

#[actix_web::test]
async fn test_recommendations_reference_ranking() {
    let app = init_app!(build_state("http://127.0.0.1:9", upload_dir()));

    let req = test::TestRequest::post()
        .uri("/api/v1/universities/recommendations")
        .set_json(json!({
            "budget": 500000,
            "careerGoals": "I want to work in data science and AI"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["totalCandidates"], 2);
    assert_eq!(body["results"][0]["candidateId"], "A");
    assert_eq!(body["results"][0]["score"], 57);
    assert_eq!(body["results"][0]["reasons"], json!(["Fits perfectly within budget"]));
    assert_eq!(body["results"][1]["candidateId"], "B");
    assert_eq!(body["results"][1]["score"], 7);
}

#[actix_web::test]
async fn test_recommendations_rejects_negative_budget() {
    let app = init_app!(build_state("http://127.0.0.1:9", upload_dir()));

    let req = test::TestRequest::post()
        .uri("/api/v1/universities/recommendations")
        .set_json(json!({ "budget": -1, "careerGoals": "AI" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "InvalidProfile");
    assert_eq!(body["status_code"], 400);
}

#[actix_web::test]
async fn test_recommendations_rejects_malformed_json() {
    let app = init_app!(build_state("http://127.0.0.1:9", upload_dir()));

    let req = test::TestRequest::post()
        .uri("/api/v1/universities/recommendations")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"budget\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "InvalidJson");
}

#[actix_web::test]
async fn test_deep_dive_passes_report_through() {
    let mut server = mockito::Server::new_async().await;
    let envelope = json!({ "candidates": [{ "content": { "parts": [{ "text": REPORT }] } }] });
    let mock = server
        .mock("POST", "/models/gemini-test:generateContent")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(envelope.to_string())
        .expect(1)
        .create_async()
        .await;

    let app = init_app!(build_state(&server.url(), upload_dir()));

    for _ in 0..2 {
        let req = test::TestRequest::get()
            .uri("/api/v1/universities/tum/deep-dive")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["officialWebsite"], "https://www.tum.de");
        assert_eq!(body["entranceExams"][0]["applicationLink"], "https://www.testas.de");
    }

    // second request served from cache
    mock.assert_async().await;
}

#[actix_web::test]
async fn test_deep_dive_upstream_failure_is_503() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/models/gemini-test:generateContent")
        .with_status(429)
        .with_body("quota exceeded")
        .create_async()
        .await;

    let app = init_app!(build_state(&server.url(), upload_dir()));

    let req = test::TestRequest::get()
        .uri("/api/v1/universities/tum/deep-dive")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "AIServiceUnavailable");
}

#[actix_web::test]
async fn test_verify_student_graduated_batch_rejected() {
    let dir = upload_dir();
    let app = init_app!(build_state("http://127.0.0.1:9", dir.clone()));

    let req = test::TestRequest::post()
        .uri("/api/v1/universities/verify-student?studentId=s-1&batch=2000-2004")
        .set_payload("id-card-bytes")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], GRADUATED_MENTOR_MESSAGE);
    assert!(body.get("token").is_none());
    assert!(!dir.exists());
}

#[actix_web::test]
async fn test_verify_student_malformed_batch_rejected() {
    let app = init_app!(build_state("http://127.0.0.1:9", upload_dir()));

    let req = test::TestRequest::post()
        .uri("/api/v1/universities/verify-student?studentId=s-1&batch=invalid")
        .set_payload("id-card-bytes")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_verify_student_stores_document() {
    let dir = upload_dir();
    let app = init_app!(build_state("http://127.0.0.1:9", dir.clone()));

    let req = test::TestRequest::post()
        .uri("/api/v1/universities/verify-student?studentId=s-2&batch=2024-2099")
        .set_payload("id-card-bytes")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Verification submitted");

    let token = body["token"].as_str().unwrap();
    let stored = std::fs::read(dir.join(format!("{}.bin", token))).unwrap();
    assert_eq!(stored, b"id-card-bytes");

    std::fs::remove_dir_all(dir).ok();
}

#[actix_web::test]
async fn test_verify_student_requires_document_and_id() {
    let app = init_app!(build_state("http://127.0.0.1:9", upload_dir()));

    let empty = test::TestRequest::post()
        .uri("/api/v1/universities/verify-student?studentId=s-3&batch=2024-2099")
        .to_request();
    assert_eq!(test::call_service(&app, empty).await.status(), StatusCode::BAD_REQUEST);

    let blank_id = test::TestRequest::post()
        .uri("/api/v1/universities/verify-student?studentId=&batch=2024-2099")
        .set_payload("id-card-bytes")
        .to_request();
    let resp = test::call_service(&app, blank_id).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "InvalidRequest");

    let missing_id = test::TestRequest::post()
        .uri("/api/v1/universities/verify-student?batch=2024-2099")
        .set_payload("id-card-bytes")
        .to_request();
    let resp = test::call_service(&app, missing_id).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "InvalidQuery");
}
