use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web, web::ServiceConfig, App};
use serde_json::{json, Value};
use tonplace_tools::{NewPurchase, TonPlaceApiError};

use super::mocks::*;
use crate::routes::{CreatePurchaseRoute, TransactionsRoute};

#[actix_web::test]
async fn create_purchase_happy_path() {
    let _ = env_logger::try_init().ok();
    let mut api = MockPlatformApi::new();
    api.expect_create_purchase()
        .withf(|purchase| *purchase == NewPurchase::eur(42, 100, "Demo Purchase"))
        .returning(|_| Ok(901));
    let (status, body) = post_create(json!({"user_id": 42, "amount": 100, "title": "Demo Purchase"}), api).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"purchase_id":901}"#);
}

#[actix_web::test]
async fn zero_and_negative_amounts_are_rejected() {
    let (status, body) = post_create(json!({"user_id": 42, "amount": 0, "title": "Demo"}), MockPlatformApi::new()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"error":"Amount must be greater than 0"}"#);
    let (_, body) = post_create(json!({"user_id": 42, "amount": -5, "title": "Demo"}), MockPlatformApi::new()).await;
    assert_eq!(body, r#"{"error":"Amount must be greater than 0"}"#);
}

#[actix_web::test]
async fn empty_titles_are_rejected() {
    let (_, body) = post_create(json!({"user_id": 42, "amount": 100, "title": ""}), MockPlatformApi::new()).await;
    assert_eq!(body, r#"{"error":"Title is required"}"#);
}

#[actix_web::test]
async fn title_length_is_counted_in_characters() {
    // 151 cyrillic characters is 302 bytes, but still over by exactly one character
    let too_long = "ж".repeat(151);
    let (_, body) = post_create(json!({"user_id": 42, "amount": 100, "title": too_long}), MockPlatformApi::new()).await;
    assert_eq!(body, r#"{"error":"Title must be 150 characters or less"}"#);

    let mut api = MockPlatformApi::new();
    api.expect_create_purchase().returning(|_| Ok(902));
    let just_fits = "ж".repeat(150);
    let (_, body) = post_create(json!({"user_id": 42, "amount": 100, "title": just_fits}), api).await;
    assert_eq!(body, r#"{"purchase_id":902}"#);
}

#[actix_web::test]
async fn create_failures_are_reported_in_band() {
    let mut api = MockPlatformApi::new();
    api.expect_create_purchase()
        .returning(|_| Err(TonPlaceApiError::QueryError { status: 403, message: "Invalid secret".into() }));
    let (status, body) = post_create(json!({"user_id": 42, "amount": 100, "title": "Demo"}), api).await;
    // The page script keys off the error field, not the status code
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Failed to create purchase"), "was: {body}");
    assert!(body.contains("Invalid secret"));
}

#[actix_web::test]
async fn transactions_returns_the_history() {
    let _ = env_logger::try_init().ok();
    let mut api = MockPlatformApi::new();
    api.expect_fetch_purchases().withf(|user_id| *user_id == 42).returning(|_| Ok(sample_purchases()));
    let (status, body) = get_transactions(42, api).await;
    assert_eq!(status, StatusCode::OK);
    let response: Value = serde_json::from_str(&body).unwrap();
    let transactions = response["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[0]["id"], 501);
    assert_eq!(transactions[0]["currency"], "eur");
    assert_eq!(transactions[0]["status"], "paid");
    assert_eq!(transactions[1]["created_at"], 1707984834);
    assert_eq!(transactions[1]["status"], "pending");
}

#[actix_web::test]
async fn transaction_failures_are_reported_in_band() {
    let mut api = MockPlatformApi::new();
    api.expect_fetch_purchases().returning(|_| Err(TonPlaceApiError::RestResponseError("timed out".into())));
    let (status, body) = get_transactions(42, api).await;
    assert_eq!(status, StatusCode::OK);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert!(response["error"].as_str().unwrap().contains("timed out"), "was: {body}");
}

fn configure_app(api: MockPlatformApi) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(api)).service(
            web::scope("/api")
                .service(CreatePurchaseRoute::<MockPlatformApi>::new())
                .service(TransactionsRoute::<MockPlatformApi>::new()),
        );
    }
}

async fn post_create(body: Value, api: MockPlatformApi) -> (StatusCode, String) {
    let req = TestRequest::post().uri("/api/create-purchase").set_json(body).to_request();
    let app = App::new().configure(configure_app(api));
    let app = test::init_service(app).await;
    let (_, res) = test::call_service(&app, req).await.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    (status, body)
}

async fn get_transactions(user_id: i64, api: MockPlatformApi) -> (StatusCode, String) {
    let req = TestRequest::get().uri(&format!("/api/transactions?user_id={user_id}")).to_request();
    let app = App::new().configure(configure_app(api));
    let app = test::init_service(app).await;
    let (_, res) = test::call_service(&app, req).await.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    (status, body)
}
