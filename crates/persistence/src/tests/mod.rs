// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod account_tests;
mod initialization_tests;

use crate::SqlitePersistence;
use perfdesk::{Command, TransitionResult, apply, apply_create};
use perfdesk_audit::{Actor, Cause};
use perfdesk_domain::{
    AdhocReview, Answer, AnswerValue, Employee, ReviewSettings, Role, SubmissionStatus,
};
use time::OffsetDateTime;

pub const ADMIN_PASSWORD: &str = "Correct-Horse-42";

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("test-cause"), String::from("Test operation"))
}

/// Creates a subject with a line manager and an HR account to trigger
/// reviews. Returns `(subject, manager_id, hr_account_id)`.
pub fn seed_directory(persistence: &mut SqlitePersistence) -> (Employee, i64, i64) {
    let now = OffsetDateTime::now_utc();
    let manager_id = persistence
        .create_employee(
            &Employee::new(
                String::from("Morgan Manager"),
                String::from("morgan@example.com"),
                Some(String::from("Platform")),
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
                Some(String::from("Platform")),
                Some(manager_id),
            ),
            now,
        )
        .unwrap();
    let hr_account_id = persistence
        .create_account("hr@example.com", ADMIN_PASSWORD, Role::Hr, None, now)
        .unwrap();

    let subject = persistence.get_employee(subject_id).unwrap().unwrap();
    (subject, manager_id, hr_account_id)
}

/// Creates and stores a review for the seeded subject.
pub fn create_stored_review(
    persistence: &mut SqlitePersistence,
    subject: &Employee,
    hr_account_id: i64,
) -> AdhocReview {
    let result: TransitionResult = apply_create(
        subject,
        Command::CreateReview {
            manager_id: None,
            triggered_by: hr_account_id,
            review_form_id: None,
            due_date: None,
            reason: Some(String::from("Project retrospective")),
            settings: ReviewSettings::default(),
        },
        Actor::account(hr_account_id),
        create_test_cause(),
        OffsetDateTime::now_utc(),
    )
    .unwrap();
    persistence.create_review(&result).unwrap()
}

pub fn sample_answers() -> Vec<Answer> {
    vec![
        Answer::new("rating", AnswerValue::Number(4.into())),
        Answer::new("strengths", AnswerValue::Text(String::from("Mentoring"))),
        Answer::new("would_rehire", AnswerValue::Boolean(true)),
        Answer::new(
            "focus_areas",
            AnswerValue::Choices(vec![String::from("delivery"), String::from("design")]),
        ),
    ]
}

/// Applies a command as the given account.
pub fn transition(review: &AdhocReview, command: Command, account_id: i64) -> TransitionResult {
    apply(
        review,
        command,
        Actor::account(account_id),
        create_test_cause(),
        OffsetDateTime::now_utc(),
    )
    .unwrap()
}

pub fn submit_self(status: SubmissionStatus) -> Command {
    Command::SubmitSelfReview {
        answers: sample_answers(),
        status,
        comments: None,
    }
}
