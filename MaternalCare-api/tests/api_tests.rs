use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, NaiveDate, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use maternal_care_api::api::{create_app, AppState};
use maternal_care_domain::auth::TokenSettings;
use maternal_care_domain::repository::Storage;
use maternal_care_domain::services::{AddressDirectory, RuleBasedProvider};

const ADMIN_EMAIL: &str = "admin@clinic.test";
const ADMIN_PASSWORD: &str = "admin-password-1";

async fn test_app() -> Router {
    let state = AppState::new(
        Storage::memory(),
        Arc::new(AddressDirectory::embedded().expect("embedded address data")),
        Arc::new(TokenSettings::new("integration-test-secret", "MaternalCare-api", 60)),
        Arc::new(RuleBasedProvider),
    );
    state
        .services
        .users
        .ensure_admin(ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .expect("bootstrap admin");
    create_app(state)
}

async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["access_token"].as_str().unwrap().to_string()
}

async fn worker_token(app: &Router) -> String {
    let (status, _) = send(
        app,
        Method::POST,
        "/auth/signup",
        None,
        Some(json!({
            "email": "Worker@Clinic.test",
            "full_name": "Liza Worker",
            "password": "worker-password-1"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    login(app, "worker@clinic.test", "worker-password-1").await
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn profile_body(first_name: &str, birth_date: NaiveDate) -> Value {
    json!({
        "first_name": first_name,
        "last_name": "Santos",
        "birth_date": birth_date.to_string(),
        "civil_status": "single",
        "educational_attainment": "Grade 10",
        "address": {
            "region_code": "07",
            "province_code": "0722",
            "municipality_code": "072217",
            "barangay_code": "072217003",
            "street": "Purok 3"
        }
    })
}

#[tokio::test]
async fn test_health_reports_degraded_memory_store() {
    let app = test_app().await;
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["components"]["api"]["status"], "ok");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::GET, "/api/v1/profiles", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let (status, _) = send(&app, Method::GET, "/api/v1/profiles", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signup_and_login() {
    let app = test_app().await;
    let token = worker_token(&app).await;

    let (status, body) = send(&app, Method::GET, "/auth/info", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "worker@clinic.test");
    assert_eq!(body["role"], "worker");

    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/signup",
        None,
        Some(json!({
            "email": "worker@clinic.test",
            "full_name": "Someone Else",
            "password": "another-password"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "worker@clinic.test", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_routes_reject_workers() {
    let app = test_app().await;
    let worker = worker_token(&app).await;

    let (status, body) = send(&app, Method::GET, "/api/v1/admin/users", Some(&worker), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let (status, body) = send(&app, Method::GET, "/api/v1/admin/users", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/admin/users",
        Some(&admin),
        Some(json!({
            "email": "second.admin@clinic.test",
            "full_name": "Second Admin",
            "password": "second-admin-pw",
            "role": "admin"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, Method::GET, &format!("/api/v1/admin/users/{}", id), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "admin");
}

#[tokio::test]
async fn test_address_selector() {
    let app = test_app().await;
    let token = worker_token(&app).await;

    let (status, body) = send(&app, Method::GET, "/api/v1/address/regions", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().iter().any(|r| r["code"] == "07"));

    let (status, body) = send(&app, Method::GET, "/api/v1/address/regions/07/provinces", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().iter().all(|p| p["parent_code"] == "07"));

    let (status, _) = send(&app, Method::GET, "/api/v1/address/regions/99/provinces", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/address/select",
        Some(&token),
        Some(json!({
            "selection": {
                "region_code": "07",
                "province_code": "0722",
                "municipality_code": "072217",
                "barangay_code": "072217003"
            },
            "level": "province",
            "code": "0712"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["selection"]["province_code"], "0712");
    assert_eq!(body["selection"]["municipality_code"], "");
    assert_eq!(body["selection"]["barangay_code"], "");
    assert!(!body["options"]["municipalities"].as_array().unwrap().is_empty());
    assert!(body["options"]["barangays"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_profile_case_flow() {
    let app = test_app().await;
    let token = worker_token(&app).await;

    // about sixteen, so no enrollment on file reads as a dropout risk
    let birth_date = today() - Duration::days(16 * 365);
    let lmp = today() - Duration::days(61);

    let (status, profile) = send(
        &app,
        Method::POST,
        "/api/v1/profiles",
        Some(&token),
        Some(profile_body("Maria", birth_date)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", profile);
    let profile_id = profile["profile_id"].as_i64().unwrap();

    let (status, body) = send(&app, Method::GET, "/api/v1/profiles?search=mar", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 1);
    assert_eq!(body["data"][0]["profile_id"], profile_id);

    let (status, record) = send(
        &app,
        Method::POST,
        &format!("/api/v1/profiles/{}/health-records", profile_id),
        Some(&token),
        Some(json!({
            "lmp": lmp.to_string(),
            "gravida": 2,
            "parity": 1,
            "systolic": 145,
            "diastolic": 92
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", record);
    let health_id = record["health_id"].as_i64().unwrap();
    assert_eq!(record["edd"], (lmp + Duration::days(280)).to_string());

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/v1/health-records/{}/visits", health_id),
        Some(&token),
        Some(json!({
            "visit_type": "prenatal",
            "visit_date": (lmp + Duration::days(40)).to_string(),
            "systolic": 118,
            "diastolic": 76
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, summary) = send(
        &app,
        Method::GET,
        &format!("/api/v1/health-records/{}/summary?as_of={}", health_id, today()),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["prenatal_visits"], 1);
    assert_eq!(summary["gestational_age_weeks"], 8);
    assert_eq!(summary["hypertension_flag"], true);

    let (status, warning) = send(
        &app,
        Method::GET,
        &format!("/api/v1/profiles/{}/early-warning", profile_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(warning["repeated_pregnancy"], true);
    assert_eq!(warning["dropout_risk"], true);
    assert_eq!(warning["source"], "rules");
}

#[tokio::test]
async fn test_missing_records_are_not_found() {
    let app = test_app().await;
    let token = worker_token(&app).await;

    let (status, body) = send(&app, Method::GET, "/api/v1/profiles/20260999", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/profiles/20260999/education",
        Some(&token),
        Some(json!({
            "program_type": "als",
            "institution": "Lahug ALS Center",
            "level_or_course": "Junior high",
            "enrollment_status": "enrolled",
            "start_date": (today() - Duration::days(30)).to_string()
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_past_the_end_has_no_next_link() {
    let app = test_app().await;
    let token = worker_token(&app).await;
    let birth_date = today() - Duration::days(16 * 365);
    send(&app, Method::POST, "/api/v1/profiles", Some(&token), Some(profile_body("Maria", birth_date))).await;

    let uri = format!("/api/v1/profiles?offset={}", usize::MAX);
    let (status, body) = send(&app, Method::GET, &uri, Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 1);
    assert!(body["data"].as_array().unwrap().is_empty());
    assert!(body["next"].is_null());
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = test_app().await;
    let (status, body) = send(&app, Method::GET, "/api-docs/openapi.json", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "MaternalCare API");
    assert!(body["paths"]["/api/v1/profiles"].is_object());
}
