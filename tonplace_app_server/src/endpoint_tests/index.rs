use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web, web::ServiceConfig, App};
use chrono::Utc;
use log::*;
use tonplace_tools::{
    auth::{params_from_query, SignatureVerifier, DEFAULT_MAX_SIGNATURE_AGE},
    TonPlaceApiError,
};
use tpa_common::Secret;

use super::mocks::*;
use crate::{
    config::VerifyOptions,
    routes::{health, IndexRoute},
};

#[actix_web::test]
async fn health_check() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::get().uri("/health").to_request();
    let app = App::new().service(health);
    let app = test::init_service(app).await;
    let (_, res) = test::call_service(&app, req).await.into_parts();
    assert!(res.status().is_success());
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    assert_eq!(body, "👍️\n");
}

#[actix_web::test]
async fn landing_page_without_launch_params() {
    let _ = env_logger::try_init().ok();
    // No expectations on the mock, so the history must not be fetched either
    let (status, body) = get_index("", MockPlatformApi::new(), checks_on()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Missing required parameters. This app must be opened from Ton.Place."), "was: {body}");
    assert!(body.contains("How to Use This Demo"));
}

#[actix_web::test]
async fn landing_page_when_user_id_is_missing() {
    let (status, body) = get_index("app_id=7&ts=123&hash=abc123", MockPlatformApi::new(), checks_on()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Missing required parameters"), "was: {body}");
}

#[actix_web::test]
async fn stale_and_tampered_launches_read_the_same() {
    let _ = env_logger::try_init().ok();
    let now = Utc::now().timestamp();
    let stale = signed_query("42", now - 3600);
    let tampered = corrupt_signature(&signed_query("42", now));

    let (status, stale_body) = get_index(&stale, MockPlatformApi::new(), checks_on()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(stale_body.contains("Authorization failed. Please reopen the app from Ton.Place."), "was: {stale_body}");
    assert!(stale_body.contains("How to Use This Demo"));

    let (status, tampered_body) = get_index(&tampered, MockPlatformApi::new(), checks_on()).await;
    assert_eq!(status, StatusCode::OK);
    // A probing client must not be able to tell which check rejected it
    assert_eq!(stale_body, tampered_body);
}

#[actix_web::test]
async fn verified_launch_renders_the_full_page() {
    let _ = env_logger::try_init().ok();
    let mut api = MockPlatformApi::new();
    api.expect_fetch_purchases().withf(|user_id| *user_id == 42).returning(|_| Ok(sample_purchases()));
    let query = signed_query("42", Utc::now().timestamp());
    let (status, body) = get_index(&query, api, checks_on()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("John"), "was: {body}");
    assert!(body.contains("✓ Verified"));
    assert!(body.contains("Demo Purchase"));
    assert!(body.contains("1.00 EUR"));
    assert!(body.contains("2.00 TON"));
    assert!(body.contains("Golden Sticker"));
    assert!(!body.contains("How to Use This Demo"));
}

#[actix_web::test]
async fn history_failure_does_not_fail_the_page() {
    let mut api = MockPlatformApi::new();
    api.expect_fetch_purchases().returning(|_| Err(TonPlaceApiError::RestResponseError("API is down".into())));
    let query = signed_query("42", Utc::now().timestamp());
    let (status, body) = get_index(&query, api, checks_on()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("✓ Verified"), "was: {body}");
    assert!(body.contains("No transactions yet"));
    assert!(!body.contains("API is down"));
}

#[actix_web::test]
async fn disabled_checks_accept_any_launch() {
    let mut api = MockPlatformApi::new();
    api.expect_fetch_purchases().returning(|_| Ok(Vec::new()));
    let options = VerifyOptions { signature_checks: false, max_signature_age: DEFAULT_MAX_SIGNATURE_AGE };
    let (status, body) = get_index("user_id=42&ts=12345&hash=nonsense", api, options).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("✓ Verified"), "was: {body}");
}

fn test_secret() -> Secret<String> {
    Secret::new("testsecret".to_string())
}

fn checks_on() -> VerifyOptions {
    VerifyOptions { signature_checks: true, max_signature_age: DEFAULT_MAX_SIGNATURE_AGE }
}

/// Builds the query string Ton.Place would attach when launching the app for `user_id` at time `ts`.
fn signed_query(user_id: &str, ts: i64) -> String {
    let query = format!("app_id=7&first_name=John&last_name=Doe&ts={ts}&user_id={user_id}");
    let params = params_from_query(&query);
    let hash = SignatureVerifier::new(&test_secret()).sign(&params);
    format!("{query}&hash={hash}")
}

/// Flips the last character of the trailing `hash` parameter.
fn corrupt_signature(query: &str) -> String {
    let mut corrupted = query.to_string();
    let last = corrupted.pop().unwrap();
    corrupted.push(if last == '0' { '1' } else { '0' });
    corrupted
}

fn configure_app(api: MockPlatformApi, options: VerifyOptions) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let verifier = SignatureVerifier::new(&test_secret());
        cfg.app_data(web::Data::new(api))
            .app_data(web::Data::new(verifier))
            .app_data(web::Data::new(options))
            .service(IndexRoute::<MockPlatformApi>::new());
    }
}

async fn get_index(query: &str, api: MockPlatformApi, options: VerifyOptions) -> (StatusCode, String) {
    let uri = if query.is_empty() { "/".to_string() } else { format!("/?{query}") };
    let req = TestRequest::get().uri(&uri).to_request();
    let app = App::new().configure(configure_app(api, options));
    let app = test::init_service(app).await;
    debug!("Making request to {uri}");
    let (_, res) = test::call_service(&app, req).await.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    (status, body)
}
