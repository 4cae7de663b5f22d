// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An answer is malformed.
    InvalidAnswer {
        /// The question the answer belongs to.
        question_id: String,
        /// Why the answer was rejected.
        reason: String,
    },
    /// The same question was answered more than once in a submission.
    DuplicateQuestion(String),
    /// Submission status is unknown or not accepted for a submit call.
    InvalidSubmissionStatus(String),
    /// Aggregate review status string is unknown.
    InvalidReviewStatus(String),
    /// Stored closure marker is unknown.
    InvalidClosure(String),
    /// Role string is unknown.
    InvalidRole(String),
    /// Review settings are inconsistent.
    InvalidSettings(String),
    /// Review reason is invalid.
    InvalidReason(String),
    /// A free-text comment field is invalid.
    InvalidComments {
        /// The field name.
        field: &'static str,
        /// Why the comment was rejected.
        reason: String,
    },
    /// Employee name is empty or invalid.
    InvalidName(String),
    /// E-mail address is malformed.
    InvalidEmail(String),
    /// Failed to parse a date from a string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// The manager assignment is not allowed.
    InvalidManager {
        /// The employee being assigned.
        employee_id: i64,
        /// Why the assignment was rejected.
        reason: String,
    },
    /// The requested lifecycle operation is not permitted in the current status.
    InvalidStatusTransition {
        /// The current aggregate status.
        from: String,
        /// The operation that was attempted.
        operation: String,
        /// Why the operation was rejected.
        reason: String,
    },
    /// Review does not exist.
    ReviewNotFound(i64),
    /// Employee does not exist.
    EmployeeNotFound(i64),
    /// The review has no manager to submit a manager review.
    NoManagerAssigned(i64),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAnswer {
                question_id,
                reason,
            } => {
                write!(f, "Invalid answer for question '{question_id}': {reason}")
            }
            Self::DuplicateQuestion(question_id) => {
                write!(f, "Question '{question_id}' is answered more than once")
            }
            Self::InvalidSubmissionStatus(msg) => write!(f, "Invalid submission status: {msg}"),
            Self::InvalidReviewStatus(msg) => write!(f, "Invalid review status: {msg}"),
            Self::InvalidClosure(msg) => write!(f, "Invalid review closure: {msg}"),
            Self::InvalidRole(msg) => write!(f, "Invalid role: {msg}"),
            Self::InvalidSettings(msg) => write!(f, "Invalid review settings: {msg}"),
            Self::InvalidReason(msg) => write!(f, "Invalid reason: {msg}"),
            Self::InvalidComments { field, reason } => {
                write!(f, "Invalid {field}: {reason}")
            }
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::InvalidEmail(msg) => write!(f, "Invalid email: {msg}"),
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::InvalidManager {
                employee_id,
                reason,
            } => {
                write!(f, "Invalid manager for employee {employee_id}: {reason}")
            }
            Self::InvalidStatusTransition {
                from,
                operation,
                reason,
            } => {
                write!(
                    f,
                    "Cannot {operation} a review in status '{from}': {reason}"
                )
            }
            Self::ReviewNotFound(id) => write!(f, "Review {id} not found"),
            Self::EmployeeNotFound(id) => write!(f, "Employee {id} not found"),
            Self::NoManagerAssigned(id) => write!(f, "Review {id} has no assigned manager"),
        }
    }
}

impl std::error::Error for DomainError {}
