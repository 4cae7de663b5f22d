// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    Answer, AnswerValue, DomainError, Employee, MAX_ANSWERS, MAX_COMMENTS_LENGTH, MAX_REASON_LENGTH,
    ReviewSettings, parse_due_date, validate_answers, validate_comments, validate_email,
    validate_employee_fields, validate_reason, validate_settings,
};
use serde_json::Number;
use time::{Date, Month};

fn create_test_employee(email: &str) -> Employee {
    Employee::new(
        String::from("Test Employee"),
        email.to_string(),
        Some(String::from("Engineering")),
        None,
    )
}

#[test]
fn test_validate_answers_accepts_mixed_values() {
    let answers: Vec<Answer> = vec![
        Answer::new("rating", AnswerValue::Number(4.into())),
        Answer::new("summary", AnswerValue::Text(String::from("Good"))),
        Answer::new("promote", AnswerValue::Boolean(false)),
        Answer::new("skills", AnswerValue::Choices(vec![String::from("rust")])),
    ];
    assert!(validate_answers(&answers).is_ok());
}

#[test]
fn test_validate_answers_accepts_empty_set() {
    assert!(validate_answers(&[]).is_ok());
}

#[test]
fn test_validate_answers_rejects_duplicate_question() {
    let answers: Vec<Answer> = vec![
        Answer::new("q1", AnswerValue::Number(1.into())),
        Answer::new("q1", AnswerValue::Number(2.into())),
    ];
    assert_eq!(
        validate_answers(&answers),
        Err(DomainError::DuplicateQuestion(String::from("q1")))
    );
}

#[test]
fn test_validate_answers_rejects_blank_question_id() {
    let answers: Vec<Answer> = vec![Answer::new("  ", AnswerValue::Boolean(true))];
    assert!(matches!(
        validate_answers(&answers),
        Err(DomainError::InvalidAnswer { .. })
    ));
}

#[test]
fn test_validate_answers_accepts_large_and_fractional_numbers() {
    let answers: Vec<Answer> = vec![
        Answer::new("q1", AnswerValue::Number(u64::MAX.into())),
        Answer::new("q2", AnswerValue::Number(Number::from_f64(0.5).unwrap())),
    ];
    assert!(validate_answers(&answers).is_ok());
}

#[test]
fn test_validate_answers_rejects_empty_choice() {
    let answers: Vec<Answer> = vec![Answer::new(
        "q1",
        AnswerValue::Choices(vec![String::from("a"), String::new()]),
    )];
    assert!(validate_answers(&answers).is_err());
}

#[test]
fn test_validate_answers_rejects_too_many() {
    let answers: Vec<Answer> = (0..=MAX_ANSWERS)
        .map(|i| Answer::new(&format!("q{i}"), AnswerValue::Boolean(true)))
        .collect();
    assert!(validate_answers(&answers).is_err());
}

#[test]
fn test_validate_settings_requires_a_track() {
    assert!(validate_settings(&ReviewSettings::default()).is_ok());

    let self_only: ReviewSettings = ReviewSettings {
        manager_review_required: false,
        ..ReviewSettings::default()
    };
    assert!(validate_settings(&self_only).is_ok());

    let neither: ReviewSettings = ReviewSettings {
        self_review_required: false,
        manager_review_required: false,
        include_goals: true,
    };
    assert!(matches!(
        validate_settings(&neither),
        Err(DomainError::InvalidSettings(_))
    ));
}

#[test]
fn test_validate_reason() {
    assert!(validate_reason(None).is_ok());
    assert!(validate_reason(Some("Role change")).is_ok());
    assert!(matches!(
        validate_reason(Some("   ")),
        Err(DomainError::InvalidReason(_))
    ));
    let long: String = "x".repeat(MAX_REASON_LENGTH + 1);
    assert!(validate_reason(Some(&long)).is_err());
}

#[test]
fn test_validate_comments_length() {
    assert!(validate_comments("comments", None).is_ok());
    assert!(validate_comments("comments", Some("")).is_ok());
    let long: String = "x".repeat(MAX_COMMENTS_LENGTH + 1);
    assert!(matches!(
        validate_comments("comments", Some(&long)),
        Err(DomainError::InvalidComments { field: "comments", .. })
    ));
}

#[test]
fn test_validate_email() {
    assert!(validate_email("dana@example.com").is_ok());
    assert!(validate_email("dana.example.com").is_err());
    assert!(validate_email("@example.com").is_err());
    assert!(validate_email("dana@example").is_err());
    assert!(validate_email("dana@@example.com").is_err());
    assert!(validate_email("dana smith@example.com").is_err());
}

#[test]
fn test_validate_employee_fields_accepts_valid_employee() {
    let employee: Employee = create_test_employee("test@example.com");
    assert!(validate_employee_fields(&employee).is_ok());
}

#[test]
fn test_validate_employee_fields_rejects_empty_name() {
    let mut employee: Employee = create_test_employee("test@example.com");
    employee.name = String::from("  ");
    assert!(matches!(
        validate_employee_fields(&employee),
        Err(DomainError::InvalidName(_))
    ));
}

#[test]
fn test_validate_employee_fields_rejects_bad_email() {
    let employee: Employee = create_test_employee("not-an-email");
    assert!(matches!(
        validate_employee_fields(&employee),
        Err(DomainError::InvalidEmail(_))
    ));
}

#[test]
fn test_validate_employee_fields_rejects_self_management() {
    let mut employee: Employee = create_test_employee("test@example.com").with_id(5);
    employee.manager_id = Some(5);
    assert!(matches!(
        validate_employee_fields(&employee),
        Err(DomainError::InvalidManager { employee_id: 5, .. })
    ));
}

#[test]
fn test_parse_due_date() {
    let date: Date = parse_due_date("2026-03-31").unwrap();
    assert_eq!(date.year(), 2026);
    assert_eq!(date.month(), Month::March);
    assert_eq!(date.day(), 31);

    assert!(matches!(
        parse_due_date("2026-02-30"),
        Err(DomainError::DateParseError { .. })
    ));
    assert!(parse_due_date("31/03/2026").is_err());
}
