mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{create_profile, register_guide, register_tourist, request, test_app, token};

#[tokio::test]
async fn guide_registration_returns_token_without_password() {
    let app = test_app();

    let body = register_guide(&app, "ravi@example.com", "Ravi Kumar").await;

    assert!(!token(&body).is_empty());
    assert_eq!(body["email"], "ravi@example.com");
    assert_eq!(body["full_name"], "Ravi Kumar");
    assert_eq!(body["has_profile"], false);
    assert!(body.get("password_hash").is_none());
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn duplicate_guide_email_is_rejected_every_time() {
    let app = test_app();
    register_guide(&app, "ravi@example.com", "Ravi Kumar").await;

    for _ in 0..2 {
        let (status, body) = request(
            &app,
            "POST",
            "/guide-auth/register",
            None,
            Some(json!({
                "email": "ravi@example.com",
                "password": "another-pass",
                "full_name": "Ravi Again",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Email already registered");
    }
}

#[tokio::test]
async fn register_requires_all_fields() {
    let app = test_app();

    let (status, _) = request(
        &app,
        "POST",
        "/guide-auth/register",
        None,
        Some(json!({
            "email": "  ",
            "password": "pass",
            "full_name": "Ravi",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_failure_does_not_reveal_which_part_was_wrong() {
    let app = test_app();
    register_guide(&app, "ravi@example.com", "Ravi Kumar").await;

    let (wrong_password_status, wrong_password_body) = request(
        &app,
        "POST",
        "/guide-auth/login",
        None,
        Some(json!({ "email": "ravi@example.com", "password": "not-it" })),
    )
    .await;
    let (unknown_email_status, unknown_email_body) = request(
        &app,
        "POST",
        "/guide-auth/login",
        None,
        Some(json!({ "email": "nobody@example.com", "password": "hunter2!" })),
    )
    .await;

    assert_eq!(wrong_password_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password_body["message"], unknown_email_body["message"]);
}

#[tokio::test]
async fn guide_login_recomputes_has_profile() {
    let app = test_app();
    let registered = register_guide(&app, "ravi@example.com", "Ravi Kumar").await;

    let credentials = json!({ "email": "ravi@example.com", "password": "hunter2!" });
    let (status, body) = request(
        &app,
        "POST",
        "/guide-auth/login",
        None,
        Some(credentials.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["has_profile"], false);

    create_profile(&app, &token(&registered), "Delhi", 800).await;

    let (status, body) = request(&app, "POST", "/guide-auth/login", None, Some(credentials)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["has_profile"], true);
}

#[tokio::test]
async fn tourist_email_is_normalized_to_lowercase() {
    let app = test_app();

    let body = register_tourist(&app, "Maya@Example.COM", "Maya Singh").await;
    assert_eq!(body["email"], "maya@example.com");

    // The duplicate check runs on the normalized value.
    let (status, _) = request(
        &app,
        "POST",
        "/tourist-auth/register",
        None,
        Some(json!({
            "email": "MAYA@example.com",
            "password": "hunter2!",
            "full_name": "Maya Singh",
            "nationality": "Indian",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = request(
        &app,
        "POST",
        "/tourist-auth/login",
        None,
        Some(json!({ "email": "maya@EXAMPLE.com", "password": "hunter2!" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn tourist_profile_is_token_gated() {
    let app = test_app();
    let tourist = register_tourist(&app, "maya@example.com", "Maya Singh").await;
    let guide = register_guide(&app, "ravi@example.com", "Ravi Kumar").await;

    let (status, body) = request(&app, "GET", "/tourist-auth/profile", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authentication required");

    let (status, body) = request(
        &app,
        "GET",
        "/tourist-auth/profile",
        Some("not-a-real-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");

    // A guide token is authenticated but the wrong side of the marketplace.
    let (status, _) = request(
        &app,
        "GET",
        "/tourist-auth/profile",
        Some(&token(&guide)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = request(
        &app,
        "GET",
        "/tourist-auth/profile",
        Some(&token(&tourist)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "maya@example.com");
    assert_eq!(body["nationality"], "Indian");
    assert!(body.get("password_hash").is_none());
}
