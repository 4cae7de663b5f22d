// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! End-to-end review lifecycles through `apply`, and the operations each
//! status rejects.

use crate::tests::helpers::{
    create_test_actor, create_test_cause, create_test_review, step, submit_manager, submit_self,
};
use crate::{Command, CoreError, apply};
use perfdesk_domain::{AdhocReview, DomainError, ReviewSettings, ReviewStatus, SubmissionStatus};
use time::OffsetDateTime;

fn try_step(review: &AdhocReview, command: Command) -> Result<AdhocReview, CoreError> {
    apply(
        review,
        command,
        create_test_actor(),
        create_test_cause(),
        OffsetDateTime::now_utc(),
    )
    .map(|r| r.new_review)
}

fn assert_conflict(result: Result<AdhocReview, CoreError>) {
    assert!(
        matches!(
            result,
            Err(CoreError::DomainViolation(
                DomainError::InvalidStatusTransition { .. }
            ))
        ),
        "expected a status transition error, got {result:?}"
    );
}

fn pending_acknowledgment_review() -> AdhocReview {
    let review: AdhocReview = create_test_review(ReviewSettings::default());
    let review: AdhocReview = step(&review, submit_self(SubmissionStatus::Submitted));
    step(&review, submit_manager(SubmissionStatus::Submitted))
}

#[test]
fn test_full_lifecycle_both_tracks_required() {
    let review: AdhocReview = create_test_review(ReviewSettings::default());
    assert_eq!(review.status(), ReviewStatus::Initiated);

    let review: AdhocReview = step(&review, submit_self(SubmissionStatus::Submitted));
    assert_eq!(review.status(), ReviewStatus::ManagerReviewPending);

    let review: AdhocReview = step(&review, submit_manager(SubmissionStatus::Submitted));
    assert_eq!(review.status(), ReviewStatus::PendingAcknowledgment);

    let review: AdhocReview = step(
        &review,
        Command::Acknowledge {
            comments: Some(String::from("Thanks")),
        },
    );
    assert_eq!(review.status(), ReviewStatus::Acknowledged);
    assert!(review.acknowledged_at.is_some());
    assert_eq!(review.acknowledgment_comments.as_deref(), Some("Thanks"));

    let review: AdhocReview = step(&review, Command::Complete);
    assert_eq!(review.status(), ReviewStatus::Completed);
    assert!(review.completed_at.is_some());
}

#[test]
fn test_manager_first_then_self() {
    let review: AdhocReview = create_test_review(ReviewSettings::default());

    let review: AdhocReview = step(&review, submit_manager(SubmissionStatus::Submitted));
    assert_eq!(review.status(), ReviewStatus::SelfReviewPending);

    let review: AdhocReview = step(&review, submit_self(SubmissionStatus::Submitted));
    assert_eq!(review.status(), ReviewStatus::PendingAcknowledgment);
}

#[test]
fn test_self_track_not_required_manager_submit_is_enough() {
    let settings: ReviewSettings = ReviewSettings {
        self_review_required: false,
        ..ReviewSettings::default()
    };
    let review: AdhocReview = create_test_review(settings);

    let review: AdhocReview = step(&review, submit_manager(SubmissionStatus::Submitted));
    assert_eq!(review.status(), ReviewStatus::PendingAcknowledgment);
}

#[test]
fn test_draft_saves_never_advance_status() {
    let review: AdhocReview = create_test_review(ReviewSettings::default());

    let review: AdhocReview = step(&review, submit_self(SubmissionStatus::InProgress));
    assert_eq!(review.status(), ReviewStatus::SelfReviewPending);

    let again: AdhocReview = step(&review, submit_self(SubmissionStatus::InProgress));
    assert_eq!(again.status(), ReviewStatus::SelfReviewPending);

    let manager_draft: AdhocReview = step(&again, submit_manager(SubmissionStatus::InProgress));
    assert_eq!(manager_draft.status(), ReviewStatus::SelfReviewPending);
}

#[test]
fn test_resubmitting_draft_over_submitted_track_moves_status_back() {
    let review: AdhocReview = create_test_review(ReviewSettings::default());
    let review: AdhocReview = step(&review, submit_self(SubmissionStatus::Submitted));
    assert_eq!(review.status(), ReviewStatus::ManagerReviewPending);

    let review: AdhocReview = step(&review, submit_self(SubmissionStatus::InProgress));
    assert_eq!(review.status(), ReviewStatus::SelfReviewPending);
    assert!(review.self_review.unwrap().submitted_at.is_none());
}

#[test]
fn test_acknowledge_from_initiated_is_a_conflict() {
    let review: AdhocReview = create_test_review(ReviewSettings::default());
    assert_conflict(try_step(&review, Command::Acknowledge { comments: None }));
}

#[test]
fn test_acknowledge_twice_is_a_conflict() {
    let review: AdhocReview = step(
        &pending_acknowledgment_review(),
        Command::Acknowledge { comments: None },
    );
    assert_conflict(try_step(&review, Command::Acknowledge { comments: None }));
}

#[test]
fn test_submissions_close_at_pending_acknowledgment() {
    let review: AdhocReview = pending_acknowledgment_review();
    assert_conflict(try_step(&review, submit_self(SubmissionStatus::Submitted)));
    assert_conflict(try_step(&review, submit_manager(SubmissionStatus::InProgress)));
}

#[test]
fn test_complete_requires_acknowledgment() {
    assert_conflict(try_step(&pending_acknowledgment_review(), Command::Complete));
}

#[test]
fn test_cancel_from_self_review_pending() {
    let review: AdhocReview = create_test_review(ReviewSettings::default());
    let review: AdhocReview = step(&review, submit_self(SubmissionStatus::InProgress));
    assert_eq!(review.status(), ReviewStatus::SelfReviewPending);

    let review: AdhocReview = step(
        &review,
        Command::Cancel {
            reason: Some(String::from("Employee transferred")),
        },
    );
    assert_eq!(review.status(), ReviewStatus::Cancelled);
    assert!(review.cancelled_at.is_some());
}

#[test]
fn test_cancel_from_completed_is_a_conflict() {
    let review: AdhocReview = step(
        &pending_acknowledgment_review(),
        Command::Acknowledge { comments: None },
    );
    let review: AdhocReview = step(&review, Command::Complete);

    assert_conflict(try_step(&review, Command::Cancel { reason: None }));
    assert_conflict(try_step(&review, Command::Delete));
    assert_conflict(try_step(&review, Command::Remind));
}

#[test]
fn test_cancel_again_keeps_first_cancellation_time() {
    let review: AdhocReview = create_test_review(ReviewSettings::default());
    let cancelled: AdhocReview = step(&review, Command::Cancel { reason: None });
    let again: AdhocReview = step(&cancelled, Command::Cancel { reason: None });

    assert_eq!(again.status(), ReviewStatus::Cancelled);
    assert_eq!(again.cancelled_at, cancelled.cancelled_at);
}

#[test]
fn test_cancelled_review_rejects_submissions_and_reminders() {
    let review: AdhocReview = step(
        &create_test_review(ReviewSettings::default()),
        Command::Cancel { reason: None },
    );
    assert_conflict(try_step(&review, submit_self(SubmissionStatus::Submitted)));
    assert_conflict(try_step(&review, Command::Remind));
    assert!(try_step(&review, Command::Delete).is_ok());
}
