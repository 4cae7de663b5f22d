// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use perfdesk_domain::{Answer, ReviewSettings, SubmissionStatus};
use time::Date;

/// A command represents user or system intent as data only.
///
/// Commands are the only way to request review state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Trigger a new ad-hoc review for an employee.
    CreateReview {
        /// Explicit manager; defaults to the subject's line manager.
        manager_id: Option<i64>,
        /// The account triggering the review.
        triggered_by: i64,
        /// Optional review form template.
        review_form_id: Option<String>,
        /// Optional due date.
        due_date: Option<Date>,
        /// Optional free-text reason.
        reason: Option<String>,
        /// Track requirements.
        settings: ReviewSettings,
    },
    /// Save or submit the subject's self review.
    SubmitSelfReview {
        /// The full answer set; replaces any earlier answers.
        answers: Vec<Answer>,
        /// `InProgress` for a draft, `Submitted` to finalise.
        status: SubmissionStatus,
        /// Optional employee comments kept with the review.
        comments: Option<String>,
    },
    /// Save or submit the manager review.
    SubmitManagerReview {
        /// The full answer set; replaces any earlier answers.
        answers: Vec<Answer>,
        /// `InProgress` for a draft, `Submitted` to finalise.
        status: SubmissionStatus,
    },
    /// The employee acknowledges the outcome.
    Acknowledge {
        /// Optional acknowledgment comments.
        comments: Option<String>,
    },
    /// Close an acknowledged review.
    Complete,
    /// Withdraw the review.
    Cancel {
        /// Optional reason, recorded in the audit trail.
        reason: Option<String>,
    },
    /// Request a reminder to the outstanding submitters.
    Remind,
    /// Hard delete the review.
    Delete,
}

impl Command {
    /// Returns the audit action name for this command.
    #[must_use]
    pub const fn action_name(&self) -> &'static str {
        match self {
            Self::CreateReview { .. } => "CreateReview",
            Self::SubmitSelfReview { .. } => "SubmitSelfReview",
            Self::SubmitManagerReview { .. } => "SubmitManagerReview",
            Self::Acknowledge { .. } => "AcknowledgeReview",
            Self::Complete => "CompleteReview",
            Self::Cancel { .. } => "CancelReview",
            Self::Remind => "RemindReview",
            Self::Delete => "DeleteReview",
        }
    }
}
