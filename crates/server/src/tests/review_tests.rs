// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::http::StatusCode;
use serde_json::json;

use super::{answers, create_review, seed_fixture, send};
use crate::live::ReviewEvent;

#[tokio::test]
async fn test_full_review_lifecycle_over_http() {
    let fixture = seed_fixture().await;
    let id = create_review(&fixture).await;

    let (status, body) = send(
        &fixture.app,
        "PUT",
        &format!("/adhoc-reviews/{id}/self-review"),
        Some(&fixture.subject_token),
        Some(json!({ "answers": answers(), "status": "submitted" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "manager_review_pending");
    assert_eq!(body["data"]["selfReview"]["answers"], answers());

    let (status, body) = send(
        &fixture.app,
        "PUT",
        &format!("/adhoc-reviews/{id}/manager-review"),
        Some(&fixture.manager_token),
        Some(json!({ "answers": answers(), "status": "submitted" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "pending_acknowledgment");

    let (status, body) = send(
        &fixture.app,
        "POST",
        &format!("/adhoc-reviews/{id}/acknowledge"),
        Some(&fixture.subject_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "acknowledged");
    assert!(body["data"]["acknowledgedAt"].is_string());

    let (status, body) = send(
        &fixture.app,
        "POST",
        &format!("/adhoc-reviews/{id}/complete"),
        Some(&fixture.hr_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "completed");

    let (status, body) = send(
        &fixture.app,
        "GET",
        &format!("/adhoc-reviews/{id}/history"),
        Some(&fixture.hr_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_wrong_submitter_is_forbidden() {
    let fixture = seed_fixture().await;
    let id = create_review(&fixture).await;

    let (status, body) = send(
        &fixture.app,
        "PUT",
        &format!("/adhoc-reviews/{id}/self-review"),
        Some(&fixture.outsider_token),
        Some(json!({ "answers": answers(), "status": "submitted" })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_illegal_transition_is_conflict() {
    let fixture = seed_fixture().await;
    let id = create_review(&fixture).await;

    let (status, body) = send(
        &fixture.app,
        "POST",
        &format!("/adhoc-reviews/{id}/acknowledge"),
        Some(&fixture.subject_token),
        Some(json!({ "comments": "Too early" })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_malformed_bodies_are_validation_errors() {
    let fixture = seed_fixture().await;
    let id = create_review(&fixture).await;

    let (status, body) = send(
        &fixture.app,
        "PUT",
        &format!("/adhoc-reviews/{id}/self-review"),
        Some(&fixture.subject_token),
        Some(json!({ "answers": "not-a-list", "status": "submitted" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, body) = send(
        &fixture.app,
        "PUT",
        &format!("/adhoc-reviews/{id}/self-review"),
        Some(&fixture.subject_token),
        Some(json!({ "answers": answers(), "status": "pending" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["details"]["field"], "status");

    let (status, _) = send(
        &fixture.app,
        "GET",
        "/adhoc-reviews/not-a-number",
        Some(&fixture.hr_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_unknown_review_is_not_found() {
    let fixture = seed_fixture().await;

    let (status, body) = send(
        &fixture.app,
        "GET",
        "/adhoc-reviews/777",
        Some(&fixture.hr_token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_list_reviews_filters_and_scopes() {
    let fixture = seed_fixture().await;
    let id = create_review(&fixture).await;

    let (status, body) = send(
        &fixture.app,
        "GET",
        "/adhoc-reviews?status=initiated",
        Some(&fixture.subject_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], id);

    let (_, body) = send(
        &fixture.app,
        "GET",
        "/adhoc-reviews",
        Some(&fixture.outsider_token),
        None,
    )
    .await;
    assert_eq!(body["data"], json!([]));

    let (status, body) = send(
        &fixture.app,
        "GET",
        "/adhoc-reviews?status=bogus",
        Some(&fixture.hr_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["details"]["field"], "status");
}

#[tokio::test]
async fn test_operations_publish_live_events() {
    let fixture = seed_fixture().await;
    let mut rx = fixture.state.broadcaster.subscribe();

    let id = create_review(&fixture).await;
    let (status, _) = send(
        &fixture.app,
        "POST",
        &format!("/adhoc-reviews/{id}/remind"),
        Some(&fixture.hr_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(
        &fixture.app,
        "DELETE",
        &format!("/adhoc-reviews/{id}"),
        Some(&fixture.hr_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    assert!(matches!(
        rx.try_recv().unwrap(),
        ReviewEvent::ReviewCreated { review_id, .. } if review_id == id
    ));
    assert_eq!(
        rx.try_recv().unwrap(),
        ReviewEvent::ReminderRequested {
            review_id: id,
            employee_id: fixture.subject_id,
            manager_id: Some(1),
            status: String::from("initiated"),
        }
    );
    assert_eq!(
        rx.try_recv().unwrap(),
        ReviewEvent::ReviewDeleted { review_id: id }
    );
}

#[tokio::test]
async fn test_draft_save_is_not_broadcast() {
    let fixture = seed_fixture().await;
    let id = create_review(&fixture).await;
    let mut rx = fixture.state.broadcaster.subscribe();

    let (status, body) = send(
        &fixture.app,
        "PUT",
        &format!("/adhoc-reviews/{id}/self-review"),
        Some(&fixture.subject_token),
        Some(json!({ "answers": answers(), "status": "in_progress" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "self_review_pending");
    assert!(rx.try_recv().is_err());
}
