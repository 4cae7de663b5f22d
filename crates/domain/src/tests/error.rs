// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::DomainError;

#[test]
fn test_domain_error_display() {
    let err: DomainError = DomainError::InvalidAnswer {
        question_id: String::from("q1"),
        reason: String::from("numeric answers must be finite"),
    };
    assert_eq!(
        format!("{err}"),
        "Invalid answer for question 'q1': numeric answers must be finite"
    );

    let err: DomainError = DomainError::DuplicateQuestion(String::from("q2"));
    assert_eq!(format!("{err}"), "Question 'q2' is answered more than once");

    let err: DomainError = DomainError::InvalidRole(String::from("owner"));
    assert_eq!(format!("{err}"), "Invalid role: owner");

    let err: DomainError = DomainError::InvalidName(String::from("test"));
    assert_eq!(format!("{err}"), "Invalid name: test");

    let err: DomainError = DomainError::InvalidComments {
        field: "comments",
        reason: String::from("too long"),
    };
    assert_eq!(format!("{err}"), "Invalid comments: too long");

    let err: DomainError = DomainError::ReviewNotFound(7);
    assert_eq!(format!("{err}"), "Review 7 not found");

    let err: DomainError = DomainError::EmployeeNotFound(3);
    assert_eq!(format!("{err}"), "Employee 3 not found");

    let err: DomainError = DomainError::NoManagerAssigned(7);
    assert_eq!(format!("{err}"), "Review 7 has no assigned manager");
}

#[test]
fn test_status_transition_display_names_operation() {
    let err: DomainError = DomainError::InvalidStatusTransition {
        from: String::from("initiated"),
        operation: String::from("acknowledge"),
        reason: String::from("only reviews pending acknowledgment can be acknowledged"),
    };
    assert_eq!(
        format!("{err}"),
        "Cannot acknowledge a review in status 'initiated': only reviews pending acknowledgment can be acknowledged"
    );
}

#[test]
fn test_date_parse_error_display() {
    let err: DomainError = DomainError::DateParseError {
        date_string: String::from("2026-13-01"),
        error: String::from("month out of range"),
    };
    assert_eq!(
        format!("{err}"),
        "Failed to parse date '2026-13-01': month out of range"
    );
}
