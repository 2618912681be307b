//! End-to-end tests for the profile endpoints and static assets.

use std::time::{Duration, Instant};

use reqwest::StatusCode;
use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn test_get_profile_on_empty_store() {
    let server = common::start_server(|_| {}).await;
    let res = common::client().get(server.url("/get-profile")).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "application/json");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn test_update_then_get_round_trip() {
    let server = common::start_server(|_| {}).await;
    let client = common::client();

    let res = client
        .post(server.url("/update-profile"))
        .json(&json!({"name": "Ann", "email": "a@x.com", "interests": "chess"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let ack: Value = res.json().await.unwrap();
    assert_eq!(ack, json!({"success": true, "message": "Profile updated successfully"}));

    let profile: Value = client
        .get(server.url("/get-profile"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        profile,
        json!({"userid": 1, "name": "Ann", "email": "a@x.com", "interests": "chess"})
    );
}

#[tokio::test]
async fn test_injection_keys_are_dropped() {
    let server = common::start_server(|_| {}).await;
    let client = common::client();

    client
        .post(server.url("/update-profile"))
        .json(&json!({"$set": {"admin": true}, "name": "x", "userid": 2}))
        .send()
        .await
        .unwrap();

    let profile: Value = client
        .get(server.url("/get-profile"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(profile, json!({"userid": 1, "name": "x", "email": "", "interests": ""}));
}

#[tokio::test]
async fn test_form_post_with_oversized_field() {
    let server = common::start_server(|_| {}).await;
    let client = common::client();

    let long = "z".repeat(1200);
    let res = client
        .post(server.url("/update-profile"))
        .form(&[("name", long.as_str()), ("interests", "go")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let profile: Value = client
        .get(server.url("/get-profile"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(profile["name"].as_str().unwrap().len(), 500);
    assert_eq!(profile["interests"], "go");
}

#[tokio::test]
async fn test_store_failure_returns_500_and_server_keeps_serving() {
    let server = common::start_server(|_| {}).await;
    let client = common::client();

    let conn = rusqlite::Connection::open(server.db_path()).unwrap();
    conn.execute("DROP TABLE users", []).unwrap();

    let res = client
        .post(server.url("/update-profile"))
        .json(&json!({"name": "Ann"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], json!(false));

    // Static routes are unaffected by the store outage.
    let res = client.get(server.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_static_assets() {
    let server = common::start_server(|_| {}).await;
    let client = common::client();

    let res = client.get(server.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "text/html; charset=utf-8");
    assert_eq!(res.text().await.unwrap(), common::INDEX_HTML);

    let res = client.get(server.url("/profile-picture")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "image/jpg");
    assert_eq!(res.bytes().await.unwrap().as_ref(), common::PICTURE_BYTES);
}

#[tokio::test]
async fn test_missing_asset_is_404() {
    let server = common::start_server(|_| {}).await;
    std::fs::remove_file(server.dir.path().join("profile-1.jpg")).unwrap();

    let res = common::client()
        .get(server.url("/profile-picture"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_security_and_request_id_headers() {
    let server = common::start_server(|_| {}).await;
    let res = common::client().get(server.url("/get-profile")).send().await.unwrap();

    let headers = res.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["referrer-policy"], "no-referrer");
    assert_eq!(headers["content-security-policy"], "default-src 'self'");
    let request_id = headers["x-request-id"].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(request_id).is_ok());
}

#[tokio::test]
async fn test_client_request_id_is_propagated() {
    let server = common::start_server(|_| {}).await;
    let res = common::client()
        .get(server.url("/get-profile"))
        .header("x-request-id", "trace-me-123")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "trace-me-123");
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let server = common::start_server(|config| config.security.max_body_size = 64).await;
    let res = common::client()
        .post(server.url("/update-profile"))
        .json(&json!({"name": "n".repeat(200)}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(res.headers()["content-type"], "application/json");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], "Request body too large");
}

#[tokio::test]
async fn test_rate_limit_rejects_after_threshold() {
    let server = common::start_server(|config| {
        config.rate_limit.enabled = true;
        config.rate_limit.window_ms = 60_000;
        config.rate_limit.max_requests = 3;
    })
    .await;
    let client = common::client();

    for expected_remaining in ["2", "1", "0"] {
        let res = client.get(server.url("/get-profile")).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()["x-ratelimit-limit"], "3");
        assert_eq!(res.headers()["x-ratelimit-remaining"], expected_remaining);
    }

    let res = client.get(server.url("/get-profile")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(res.headers().contains_key("retry-after"));
    assert_eq!(res.headers()["x-content-type-options"], "nosniff");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_rate_limit_slows_down_repeat_clients() {
    let server = common::start_server(|config| {
        config.rate_limit.enabled = true;
        config.rate_limit.window_ms = 60_000;
        config.rate_limit.max_requests = 10;
        config.rate_limit.delay_after = 1;
        config.rate_limit.delay_ms = 300;
    })
    .await;
    let client = common::client();

    let mut elapsed = Vec::new();
    for _ in 0..3 {
        let start = Instant::now();
        let res = client.get(server.url("/get-profile")).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        elapsed.push(start.elapsed());
    }

    assert!(elapsed[1] >= Duration::from_millis(300), "second request took {:?}", elapsed[1]);
    assert!(elapsed[2] >= Duration::from_millis(600), "third request took {:?}", elapsed[2]);
}
