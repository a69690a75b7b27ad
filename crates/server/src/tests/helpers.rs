// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helpers for driving the router in-process.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use roster_api::RetryPolicy;
use roster_persistence::Persistence;
use serde::Serialize;
use serde_json::Value;
use tower::ServiceExt;

use crate::{AppState, build_router};

pub const TEST_PASSWORD: &str = "Ch@lkB0ard-42";

/// Helper to create a router over a fresh in-memory database.
pub fn create_test_app() -> Router {
    let persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    build_router(AppState::new(
        persistence,
        time::Duration::hours(1),
        RetryPolicy::new(2),
    ))
}

/// Sends a request and returns the status with the decoded JSON body.
pub async fn send<B: Serialize>(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<&B>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let body: Body = match body {
        Some(body) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_string(body).unwrap())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status: StatusCode = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

pub async fn get(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    send::<Value>(app, "GET", uri, Some(token), None).await
}

pub async fn post(app: &Router, uri: &str, token: &str, body: &Value) -> (StatusCode, Value) {
    send(app, "POST", uri, Some(token), Some(body)).await
}

pub fn email_for(full_name: &str) -> String {
    format!("{}@school.test", full_name.to_lowercase().replace(' ', "."))
}

/// Creates the first principal and returns a session token for them.
pub async fn bootstrap_principal(app: &Router) -> String {
    let body = serde_json::json!({
        "full_name": "Grace Hopper",
        "email": email_for("Grace Hopper"),
        "password": TEST_PASSWORD,
        "password_confirmation": TEST_PASSWORD,
    });
    let (status, _) = send(app, "POST", "/api/v1/bootstrap/principal", None, Some(&body)).await;
    assert_eq!(status, StatusCode::CREATED);

    login(app, &email_for("Grace Hopper")).await
}

pub async fn login(app: &Router, email: &str) -> String {
    let body = serde_json::json!({ "email": email, "password": TEST_PASSWORD });
    let (status, value) = send(app, "POST", "/api/v1/auth/login", None, Some(&body)).await;
    assert_eq!(status, StatusCode::OK, "login failed: {value}");
    value["session_token"].as_str().unwrap().to_string()
}

/// Registers a user and returns `(user_id, session_token)`.
pub async fn register(app: &Router, token: &str, full_name: &str, role: &str) -> (i64, String) {
    let body = serde_json::json!({
        "full_name": full_name,
        "email": email_for(full_name),
        "role": role,
        "password": TEST_PASSWORD,
        "password_confirmation": TEST_PASSWORD,
    });
    let (status, value) = post(app, "/api/v1/users", token, &body).await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {value}");
    let user_id: i64 = value["user"]["user_id"].as_i64().unwrap();
    (user_id, login(app, &email_for(full_name)).await)
}

/// Creates a Monday/Wednesday 08:00-15:00 classroom and returns its id.
pub async fn create_classroom(app: &Router, token: &str, name: &str) -> i64 {
    let body = serde_json::json!({
        "name": name,
        "start_time": "08:00",
        "end_time": "15:00",
        "days": ["Monday", "Wednesday"],
    });
    let (status, value) = post(app, "/api/v1/classrooms", token, &body).await;
    assert_eq!(status, StatusCode::CREATED, "create classroom failed: {value}");
    value["classroom"]["classroom_id"].as_i64().unwrap()
}

pub fn period(subject: &str, day: &str, start: &str, end: &str) -> Value {
    serde_json::json!({
        "subject": subject,
        "day": day,
        "start_time": start,
        "end_time": end,
    })
}
