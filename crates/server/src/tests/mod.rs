// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! HTTP tests against the router.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod review_tests;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use perfdesk_api::{AuthConfig, AuthenticationService, Principal};
use perfdesk_domain::{Employee, Role};
use perfdesk_persistence::SqlitePersistence;
use serde_json::{Value, json};
use time::OffsetDateTime;
use tower::ServiceExt;

use crate::{AppState, build_router};

pub const TEST_JWT_SECRET: &str = "server-test-signing-secret";
pub const TEST_PASSWORD: &str = "Correct-Horse-42";

/// A router over a seeded in-memory database, with access tokens for each
/// participant.
pub struct Fixture {
    pub state: AppState,
    pub app: Router,
    pub subject_id: i64,
    pub hr_token: String,
    pub subject_token: String,
    pub manager_token: String,
    pub outsider_token: String,
}

pub fn create_test_app_state() -> AppState {
    let persistence: SqlitePersistence =
        SqlitePersistence::new_in_memory().expect("Failed to create in-memory persistence");
    AppState::new(persistence, AuthConfig::new(TEST_JWT_SECRET))
}

fn token_for(config: &AuthConfig, principal: &Principal) -> String {
    AuthenticationService::issue_access_token(config, principal, OffsetDateTime::now_utc())
        .unwrap()
}

fn principal(account_id: i64, email: &str, role: Role, employee_id: Option<i64>) -> Principal {
    Principal {
        account_id,
        email: String::from(email),
        role,
        employee_id,
    }
}

/// Seeds a manager, their report (the subject), a colleague and an HR
/// account. Only the HR account is stored; reviews reference it as their
/// initiator.
pub async fn seed_fixture() -> Fixture {
    let state = create_test_app_state();
    let now = OffsetDateTime::now_utc();

    let mut persistence = state.persistence.lock().await;
    let manager_id = persistence
        .create_employee(
            &Employee::new(
                String::from("Morgan Manager"),
                String::from("morgan@example.com"),
                None,
                None,
            ),
            now,
        )
        .unwrap();
    let subject_id = persistence
        .create_employee(
            &Employee::new(
                String::from("Sam Subject"),
                String::from("sam@example.com"),
                None,
                Some(manager_id),
            ),
            now,
        )
        .unwrap();
    let outsider_id = persistence
        .create_employee(
            &Employee::new(
                String::from("Olive Outsider"),
                String::from("olive@example.com"),
                None,
                None,
            ),
            now,
        )
        .unwrap();
    let hr_account_id = persistence
        .create_account("hr@example.com", TEST_PASSWORD, Role::Hr, None, now)
        .unwrap();
    drop(persistence);

    let config = &state.auth;
    let hr_token = token_for(
        config,
        &principal(hr_account_id, "hr@example.com", Role::Hr, None),
    );
    let subject_token = token_for(
        config,
        &principal(101, "sam@example.com", Role::Employee, Some(subject_id)),
    );
    let manager_token = token_for(
        config,
        &principal(102, "morgan@example.com", Role::Manager, Some(manager_id)),
    );
    let outsider_token = token_for(
        config,
        &principal(103, "olive@example.com", Role::Employee, Some(outsider_id)),
    );

    Fixture {
        app: build_router(state.clone()),
        state,
        subject_id,
        hr_token,
        subject_token,
        manager_token,
        outsider_token,
    }
}

/// Sends one request and returns the status and decoded JSON body.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub fn answers() -> Value {
    json!([
        { "questionId": "rating", "value": 4 },
        { "questionId": "confidence", "value": 0.75 },
        { "questionId": "strengths", "value": "Calm under pressure" },
        { "questionId": "would_rehire", "value": true },
        { "questionId": "focus_areas", "value": ["delivery", "design"] }
    ])
}

/// Creates a review for the fixture's subject as HR and returns its id.
pub async fn create_review(fixture: &Fixture) -> i64 {
    let (status, body) = send(
        &fixture.app,
        "POST",
        "/adhoc-reviews",
        Some(&fixture.hr_token),
        Some(json!({
            "employee_id": fixture.subject_id,
            "reason": "Project retrospective",
            "due_date": "2026-12-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_i64().unwrap()
}
