// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use perfdesk_audit::Cause;
use perfdesk_domain::{Answer, AnswerValue, Employee, ReviewSettings, Role, SubmissionStatus};
use perfdesk_persistence::SqlitePersistence;
use time::OffsetDateTime;

use crate::{
    AuthConfig, CreateReviewRequest, Principal, ReviewInfo, SubmitReviewRequest, create_review,
};

pub const TEST_PASSWORD: &str = "Correct-Horse-42";
pub const TEST_JWT_SECRET: &str = "test-signing-secret-that-is-long-enough";

/// The people taking part in one review: a subject, their line manager,
/// an HR account that triggers reviews and an uninvolved colleague.
pub struct Directory {
    pub subject: Principal,
    pub manager: Principal,
    pub hr: Principal,
    pub admin: Principal,
    pub outsider: Principal,
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-test"), String::from("API request"))
}

pub fn create_test_config() -> AuthConfig {
    AuthConfig::new(TEST_JWT_SECRET)
}

pub fn new_persistence() -> SqlitePersistence {
    SqlitePersistence::new_in_memory().unwrap()
}

fn add_employee(
    persistence: &mut SqlitePersistence,
    name: &str,
    email: &str,
    manager_id: Option<i64>,
) -> i64 {
    persistence
        .create_employee(
            &Employee::new(
                String::from(name),
                String::from(email),
                Some(String::from("Platform")),
                manager_id,
            ),
            OffsetDateTime::now_utc(),
        )
        .unwrap()
}

/// Seeds the directory. Only the HR and manager accounts are stored, since
/// reviews reference the triggering account; the other principals carry
/// ids that never need to exist as accounts for review operations.
pub fn seed_directory(persistence: &mut SqlitePersistence) -> Directory {
    let manager_id = add_employee(persistence, "Morgan Manager", "morgan@example.com", None);
    let subject_id = add_employee(
        persistence,
        "Sam Subject",
        "sam@example.com",
        Some(manager_id),
    );
    let outsider_id = add_employee(
        persistence,
        "Olive Outsider",
        "olive@example.com",
        Some(manager_id),
    );
    let hr_account_id = persistence
        .create_account(
            "hr@example.com",
            TEST_PASSWORD,
            Role::Hr,
            None,
            OffsetDateTime::now_utc(),
        )
        .unwrap();
    let manager_account_id = persistence
        .create_account(
            "morgan@example.com",
            TEST_PASSWORD,
            Role::Manager,
            Some(manager_id),
            OffsetDateTime::now_utc(),
        )
        .unwrap();

    Directory {
        subject: principal(1001, "sam@example.com", Role::Employee, Some(subject_id)),
        manager: principal(
            manager_account_id,
            "morgan@example.com",
            Role::Manager,
            Some(manager_id),
        ),
        hr: principal(hr_account_id, "hr@example.com", Role::Hr, None),
        admin: principal(1004, "admin@example.com", Role::Admin, None),
        outsider: principal(1005, "olive@example.com", Role::Employee, Some(outsider_id)),
    }
}

pub fn principal(account_id: i64, email: &str, role: Role, employee_id: Option<i64>) -> Principal {
    Principal {
        account_id,
        email: String::from(email),
        role,
        employee_id,
    }
}

pub fn create_request(employee_id: i64, settings: Option<ReviewSettings>) -> CreateReviewRequest {
    CreateReviewRequest {
        employee_id,
        manager_id: None,
        due_date: Some(String::from("2026-12-01")),
        reason: Some(String::from("Project retrospective")),
        review_form_id: Some(String::from("form-adhoc-v1")),
        settings,
    }
}

/// Triggers a review for the subject as HR with the given settings.
pub fn create_test_review(
    persistence: &mut SqlitePersistence,
    directory: &Directory,
    settings: Option<ReviewSettings>,
) -> ReviewInfo {
    create_review(
        persistence,
        create_request(directory.subject.employee_id.unwrap(), settings),
        &directory.hr,
        create_test_cause(),
        OffsetDateTime::now_utc(),
    )
    .unwrap()
    .response
}

pub fn sample_answers() -> Vec<Answer> {
    vec![
        Answer::new("rating", AnswerValue::Number(4.into())),
        Answer::new(
            "strengths",
            AnswerValue::Text(String::from("Mentors new starters")),
        ),
        Answer::new("would_rehire", AnswerValue::Boolean(true)),
        Answer::new(
            "focus_areas",
            AnswerValue::Choices(vec![String::from("delivery"), String::from("design")]),
        ),
    ]
}

pub fn submission(status: SubmissionStatus) -> SubmitReviewRequest {
    SubmitReviewRequest {
        answers: sample_answers(),
        status,
        comments: None,
    }
}
