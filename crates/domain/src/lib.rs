// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod review;
mod review_status;
mod submission;
mod types;
mod validation;

#[cfg(test)]
mod tests;

// Re-export public types
pub use error::DomainError;
pub use review::AdhocReview;
pub use review_status::{ReviewClosure, ReviewStatus, compute_next_status, derive_status};
pub use submission::{Answer, AnswerValue, Submission, SubmissionStatus};
pub use types::{Employee, ReviewSettings, Role};
pub use validation::{
    MAX_ANSWERS, MAX_COMMENTS_LENGTH, MAX_REASON_LENGTH, MAX_TEXT_ANSWER_LENGTH, parse_due_date,
    validate_answers, validate_comments, validate_email, validate_employee_fields, validate_reason,
    validate_settings,
};
