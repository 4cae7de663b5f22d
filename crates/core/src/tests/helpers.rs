// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Command, TransitionResult, apply, apply_create};
use perfdesk_audit::{Actor, Cause};
use perfdesk_domain::{AdhocReview, Answer, AnswerValue, Employee, ReviewSettings, SubmissionStatus};
use time::OffsetDateTime;

pub const SUBJECT_ID: i64 = 10;
pub const MANAGER_ID: i64 = 20;
pub const TRIGGER_ACCOUNT_ID: i64 = 1;

pub fn create_test_actor() -> Actor {
    Actor::account(TRIGGER_ACCOUNT_ID)
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("HR request"))
}

pub fn create_test_subject() -> Employee {
    Employee::new(
        String::from("Sam Subject"),
        String::from("sam@example.com"),
        Some(String::from("Platform")),
        Some(MANAGER_ID),
    )
    .with_id(SUBJECT_ID)
}

pub fn create_command(settings: ReviewSettings) -> Command {
    Command::CreateReview {
        manager_id: None,
        triggered_by: TRIGGER_ACCOUNT_ID,
        review_form_id: Some(String::from("form-adhoc-v1")),
        due_date: None,
        reason: Some(String::from("Promotion case")),
        settings,
    }
}

/// Creates a review as if persisted with id 1.
pub fn create_test_review(settings: ReviewSettings) -> AdhocReview {
    let result: TransitionResult = apply_create(
        &create_test_subject(),
        create_command(settings),
        create_test_actor(),
        create_test_cause(),
        OffsetDateTime::now_utc(),
    )
    .unwrap();
    let mut review: AdhocReview = result.new_review;
    review.review_id = Some(1);
    review
}

pub fn sample_answers() -> Vec<Answer> {
    vec![
        Answer::new("rating", AnswerValue::Number(4.into())),
        Answer::new(
            "summary",
            AnswerValue::Text(String::from("Strong delivery")),
        ),
    ]
}

pub fn submit_self(status: SubmissionStatus) -> Command {
    Command::SubmitSelfReview {
        answers: sample_answers(),
        status,
        comments: None,
    }
}

pub fn submit_manager(status: SubmissionStatus) -> Command {
    Command::SubmitManagerReview {
        answers: sample_answers(),
        status,
    }
}

/// Applies a command and returns the new review, panicking on failure.
pub fn step(review: &AdhocReview, command: Command) -> AdhocReview {
    apply(
        review,
        command,
        create_test_actor(),
        create_test_cause(),
        OffsetDateTime::now_utc(),
    )
    .unwrap()
    .new_review
}
