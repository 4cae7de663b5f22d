// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Review submission records.
//!
//! A review carries two independent submission tracks (self and manager).
//! Each track owns its own status and answer set; the aggregate review
//! status is derived from both in `review_status`.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::str::FromStr;
use time::OffsetDateTime;

/// The value given for a single question.
///
/// On the wire this is the bare JSON value, so the variant is chosen by the
/// JSON type: bool, number, string or array of strings. Numbers keep their
/// JSON form, so integers come back as integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// Yes/no questions.
    Boolean(bool),
    /// Rating and numeric questions.
    Number(Number),
    /// Free-text questions.
    Text(String),
    /// Multiple-choice questions.
    Choices(Vec<String>),
}

/// An answer to one question of the review form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    /// The question identifier from the review form.
    #[serde(alias = "question_id")]
    pub question_id: String,
    /// The answer value.
    pub value: AnswerValue,
}

impl Answer {
    /// Creates a new answer.
    #[must_use]
    pub fn new(question_id: &str, value: AnswerValue) -> Self {
        Self {
            question_id: question_id.to_string(),
            value,
        }
    }
}

/// Status of a single submission track.
///
/// This is local to the track and distinct from the aggregate review status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    /// Nothing saved yet.
    Pending,
    /// Draft saved; the submitter is still working.
    InProgress,
    /// Final answers submitted.
    Submitted,
}

impl SubmissionStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Submitted => "submitted",
        }
    }
}

impl FromStr for SubmissionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "submitted" => Ok(Self::Submitted),
            _ => Err(DomainError::InvalidSubmissionStatus(s.to_string())),
        }
    }
}

/// One submission track of a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// Track-local status.
    pub status: SubmissionStatus,
    /// Set only when the track reaches `Submitted`.
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub submitted_at: Option<OffsetDateTime>,
    /// The answers, in the order they were given.
    pub answers: Vec<Answer>,
}

impl Submission {
    /// Records a submit call for a track.
    ///
    /// The answer set replaces any earlier one wholesale. `submitted_at` is
    /// stamped only for a final submission.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSubmissionStatus` if `status` is `Pending`;
    /// a submit call must either save a draft or submit.
    pub fn record(
        answers: Vec<Answer>,
        status: SubmissionStatus,
        now: OffsetDateTime,
    ) -> Result<Self, DomainError> {
        let submitted_at: Option<OffsetDateTime> = match status {
            SubmissionStatus::Pending => {
                return Err(DomainError::InvalidSubmissionStatus(String::from(
                    "a submission must be 'in_progress' or 'submitted'",
                )));
            }
            SubmissionStatus::InProgress => None,
            SubmissionStatus::Submitted => Some(now),
        };

        Ok(Self {
            status,
            submitted_at,
            answers,
        })
    }

    /// Returns true if the track holds a final submission.
    #[must_use]
    pub const fn is_submitted(&self) -> bool {
        matches!(self.status, SubmissionStatus::Submitted)
    }
}
