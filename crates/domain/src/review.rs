// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::review_status::{ReviewClosure, ReviewStatus, derive_status};
use crate::submission::{Submission, SubmissionStatus};
use crate::types::ReviewSettings;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

/// An out-of-cycle performance review for one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdhocReview {
    /// The canonical identifier assigned by the database.
    /// `None` indicates the review has not been persisted yet.
    pub review_id: Option<i64>,
    /// The employee under review.
    pub employee_id: i64,
    /// The manager expected to submit the manager review.
    pub manager_id: Option<i64>,
    /// The account that initiated the review.
    pub triggered_by: i64,
    /// Optional review form template identifier.
    pub review_form_id: Option<String>,
    /// Optional due date.
    pub due_date: Option<Date>,
    /// Optional free-text reason for the review.
    pub reason: Option<String>,
    /// When the last reminder was requested.
    pub last_reminder_sent_at: Option<OffsetDateTime>,
    /// Requirements fixed at creation.
    pub settings: ReviewSettings,
    /// The subject's self review track.
    pub self_review: Option<Submission>,
    /// The manager review track.
    pub manager_review: Option<Submission>,
    /// Stored closing marker; the open statuses are derived.
    pub closure: ReviewClosure,
    /// When the employee acknowledged.
    pub acknowledged_at: Option<OffsetDateTime>,
    /// Comments given with the acknowledgment.
    pub acknowledgment_comments: Option<String>,
    /// Free-form employee comments.
    pub employee_comments: Option<String>,
    /// When the review was completed.
    pub completed_at: Option<OffsetDateTime>,
    /// When the review was cancelled.
    pub cancelled_at: Option<OffsetDateTime>,
    /// Revision counter for optimistic concurrency.
    pub version: i64,
    /// Creation timestamp.
    pub created_at: OffsetDateTime,
    /// Last modification timestamp.
    pub updated_at: OffsetDateTime,
}

impl AdhocReview {
    /// Creates a new, not yet persisted, review.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        employee_id: i64,
        manager_id: Option<i64>,
        triggered_by: i64,
        review_form_id: Option<String>,
        due_date: Option<Date>,
        reason: Option<String>,
        settings: ReviewSettings,
        now: OffsetDateTime,
    ) -> Self {
        Self {
            review_id: None,
            employee_id,
            manager_id,
            triggered_by,
            review_form_id,
            due_date,
            reason,
            last_reminder_sent_at: None,
            settings,
            self_review: None,
            manager_review: None,
            closure: ReviewClosure::Open,
            acknowledged_at: None,
            acknowledgment_comments: None,
            employee_comments: None,
            completed_at: None,
            cancelled_at: None,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the aggregate status, derived from the tracks and closure.
    #[must_use]
    pub fn status(&self) -> ReviewStatus {
        derive_status(
            &self.settings,
            self.self_review.as_ref().map(|s| s.status),
            self.manager_review.as_ref().map(|s| s.status),
            self.closure,
        )
    }

    /// Returns the self track status, if the track has been touched.
    #[must_use]
    pub fn self_review_status(&self) -> Option<SubmissionStatus> {
        self.self_review.as_ref().map(|s| s.status)
    }

    /// Returns the manager track status, if the track has been touched.
    #[must_use]
    pub fn manager_review_status(&self) -> Option<SubmissionStatus> {
        self.manager_review.as_ref().map(|s| s.status)
    }

    /// Returns true if the given account or employee takes part in this review
    /// as subject, manager or initiator.
    #[must_use]
    pub fn involves(&self, account_id: i64, employee_id: Option<i64>) -> bool {
        if self.triggered_by == account_id {
            return true;
        }
        employee_id.is_some_and(|id| id == self.employee_id || self.manager_id == Some(id))
    }
}
