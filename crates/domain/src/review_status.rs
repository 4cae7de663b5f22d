// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Review status tracking and transition logic.
//!
//! The aggregate status of a review is never set directly. While a review
//! is open it is derived from the two submission tracks and the review
//! settings. Only the explicit closing actions (acknowledge, complete,
//! cancel) are stored, as a [`ReviewClosure`] marker.

use crate::error::DomainError;
use crate::submission::SubmissionStatus;
use crate::types::ReviewSettings;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Aggregate lifecycle state of an ad-hoc review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    /// Created; neither track has saved anything yet.
    Initiated,
    /// Waiting on the subject's self review.
    SelfReviewPending,
    /// Waiting on the manager review.
    ManagerReviewPending,
    /// All required tracks submitted; waiting on the employee.
    PendingAcknowledgment,
    /// Employee acknowledged the outcome.
    Acknowledged,
    /// Closed after acknowledgment.
    Completed,
    /// Withdrawn before completion.
    Cancelled,
}

impl ReviewStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Initiated => "initiated",
            Self::SelfReviewPending => "self_review_pending",
            Self::ManagerReviewPending => "manager_review_pending",
            Self::PendingAcknowledgment => "pending_acknowledgment",
            Self::Acknowledged => "acknowledged",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidReviewStatus` if the string is not a valid status.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "initiated" => Ok(Self::Initiated),
            "self_review_pending" => Ok(Self::SelfReviewPending),
            "manager_review_pending" => Ok(Self::ManagerReviewPending),
            "pending_acknowledgment" => Ok(Self::PendingAcknowledgment),
            "acknowledged" => Ok(Self::Acknowledged),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidReviewStatus(s.to_string())),
        }
    }

    /// Returns true if this status is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    fn reject(self, operation: &str, reason: &str) -> DomainError {
        DomainError::InvalidStatusTransition {
            from: self.as_str().to_string(),
            operation: operation.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Validates that a self or manager submission may be recorded.
    ///
    /// # Errors
    ///
    /// Returns an error once all required tracks are in or the review is closed.
    pub fn validate_submission(&self) -> Result<(), DomainError> {
        match self {
            Self::Initiated | Self::SelfReviewPending | Self::ManagerReviewPending => Ok(()),
            Self::PendingAcknowledgment
            | Self::Acknowledged
            | Self::Completed
            | Self::Cancelled => Err(self.reject(
                "submit",
                "submissions are closed once the review awaits acknowledgment",
            )),
        }
    }

    /// Validates that the review may be acknowledged.
    ///
    /// # Errors
    ///
    /// Returns an error unless the status is exactly `PendingAcknowledgment`.
    pub fn validate_acknowledge(&self) -> Result<(), DomainError> {
        if *self == Self::PendingAcknowledgment {
            Ok(())
        } else {
            Err(self.reject(
                "acknowledge",
                "only reviews pending acknowledgment can be acknowledged",
            ))
        }
    }

    /// Validates that the review may be completed.
    ///
    /// # Errors
    ///
    /// Returns an error unless the status is exactly `Acknowledged`.
    pub fn validate_complete(&self) -> Result<(), DomainError> {
        if *self == Self::Acknowledged {
            Ok(())
        } else {
            Err(self.reject("complete", "only acknowledged reviews can be completed"))
        }
    }

    /// Validates that the review may be cancelled.
    ///
    /// # Errors
    ///
    /// Returns an error if the review is already completed.
    pub fn validate_cancel(&self) -> Result<(), DomainError> {
        if *self == Self::Completed {
            Err(self.reject("cancel", "completed reviews are immutable history"))
        } else {
            Ok(())
        }
    }

    /// Validates that a reminder may be sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the review is completed or cancelled.
    pub fn validate_remind(&self) -> Result<(), DomainError> {
        if self.is_terminal() {
            Err(self.reject("remind", "the review is closed"))
        } else {
            Ok(())
        }
    }

    /// Validates that the review may be deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the review is already completed.
    pub fn validate_delete(&self) -> Result<(), DomainError> {
        if *self == Self::Completed {
            Err(self.reject("delete", "completed reviews are immutable history"))
        } else {
            Ok(())
        }
    }
}

impl FromStr for ReviewStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The explicitly stored part of a review's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewClosure {
    /// Still collecting submissions; status is derived.
    #[default]
    Open,
    /// Acknowledged by the employee.
    Acknowledged,
    /// Closed after acknowledgment.
    Completed,
    /// Withdrawn.
    Cancelled,
}

impl ReviewClosure {
    /// Returns the string representation used for persistence.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Acknowledged => "acknowledged",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl FromStr for ReviewClosure {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "acknowledged" => Ok(Self::Acknowledged),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidClosure(s.to_string())),
        }
    }
}

/// Computes the waiting state of an open review from its two tracks.
///
/// Required tracks gate progress independently and submission order does
/// not matter. A track that is not required counts as done. Only a
/// `Submitted` track is done; a draft is still outstanding.
#[must_use]
pub fn compute_next_status(
    settings: &ReviewSettings,
    self_status: Option<SubmissionStatus>,
    manager_status: Option<SubmissionStatus>,
) -> ReviewStatus {
    let self_done: bool = self_status == Some(SubmissionStatus::Submitted);
    let manager_done: bool = manager_status == Some(SubmissionStatus::Submitted);

    if settings.self_review_required && !self_done {
        ReviewStatus::SelfReviewPending
    } else if settings.manager_review_required && !manager_done {
        ReviewStatus::ManagerReviewPending
    } else {
        ReviewStatus::PendingAcknowledgment
    }
}

/// Derives the aggregate status of a review.
#[must_use]
pub fn derive_status(
    settings: &ReviewSettings,
    self_status: Option<SubmissionStatus>,
    manager_status: Option<SubmissionStatus>,
    closure: ReviewClosure,
) -> ReviewStatus {
    match closure {
        ReviewClosure::Acknowledged => ReviewStatus::Acknowledged,
        ReviewClosure::Completed => ReviewStatus::Completed,
        ReviewClosure::Cancelled => ReviewStatus::Cancelled,
        ReviewClosure::Open => {
            if self_status.is_none() && manager_status.is_none() {
                ReviewStatus::Initiated
            } else {
                compute_next_status(settings, self_status, manager_status)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const ALL_STATUSES: [ReviewStatus; 7] = [
        ReviewStatus::Initiated,
        ReviewStatus::SelfReviewPending,
        ReviewStatus::ManagerReviewPending,
        ReviewStatus::PendingAcknowledgment,
        ReviewStatus::Acknowledged,
        ReviewStatus::Completed,
        ReviewStatus::Cancelled,
    ];

    const TRACK_STATES: [Option<SubmissionStatus>; 4] = [
        None,
        Some(SubmissionStatus::Pending),
        Some(SubmissionStatus::InProgress),
        Some(SubmissionStatus::Submitted),
    ];

    fn settings(self_required: bool, manager_required: bool) -> ReviewSettings {
        ReviewSettings {
            self_review_required: self_required,
            manager_review_required: manager_required,
            include_goals: true,
        }
    }

    #[test]
    fn test_status_string_round_trip() {
        for status in ALL_STATUSES {
            match ReviewStatus::parse_str(status.as_str()) {
                Ok(parsed) => assert_eq!(status, parsed),
                Err(e) => panic!("Failed to parse status string: {status}: {e}"),
            }
        }
    }

    #[test]
    fn test_invalid_status_string() {
        assert!(ReviewStatus::parse_str("archived").is_err());
        assert!(ReviewClosure::from_str("archived").is_err());
    }

    #[test]
    fn test_both_required_neither_done_waits_on_self() {
        for (s, m) in [
            (None, None),
            (Some(SubmissionStatus::InProgress), None),
            (None, Some(SubmissionStatus::InProgress)),
            (
                Some(SubmissionStatus::InProgress),
                Some(SubmissionStatus::InProgress),
            ),
        ] {
            assert_eq!(
                compute_next_status(&settings(true, true), s, m),
                ReviewStatus::SelfReviewPending
            );
        }
    }

    #[test]
    fn test_self_done_waits_on_manager() {
        assert_eq!(
            compute_next_status(
                &settings(true, true),
                Some(SubmissionStatus::Submitted),
                None
            ),
            ReviewStatus::ManagerReviewPending
        );
        assert_eq!(
            compute_next_status(
                &settings(true, true),
                Some(SubmissionStatus::Submitted),
                Some(SubmissionStatus::InProgress)
            ),
            ReviewStatus::ManagerReviewPending
        );
    }

    #[test]
    fn test_manager_first_still_waits_on_self() {
        assert_eq!(
            compute_next_status(
                &settings(true, true),
                None,
                Some(SubmissionStatus::Submitted)
            ),
            ReviewStatus::SelfReviewPending
        );
    }

    #[test]
    fn test_both_done_awaits_acknowledgment() {
        assert_eq!(
            compute_next_status(
                &settings(true, true),
                Some(SubmissionStatus::Submitted),
                Some(SubmissionStatus::Submitted)
            ),
            ReviewStatus::PendingAcknowledgment
        );
    }

    #[test]
    fn test_unrequired_self_track_is_vacuously_done() {
        assert_eq!(
            compute_next_status(
                &settings(false, true),
                None,
                Some(SubmissionStatus::Submitted)
            ),
            ReviewStatus::PendingAcknowledgment
        );
        assert_eq!(
            compute_next_status(
                &settings(false, true),
                None,
                Some(SubmissionStatus::InProgress)
            ),
            ReviewStatus::ManagerReviewPending
        );
    }

    #[test]
    fn test_unrequired_manager_track_is_vacuously_done() {
        assert_eq!(
            compute_next_status(
                &settings(true, false),
                Some(SubmissionStatus::Submitted),
                None
            ),
            ReviewStatus::PendingAcknowledgment
        );
    }

    #[test]
    fn test_compute_is_total_and_never_closes() {
        for self_required in [true, false] {
            for manager_required in [true, false] {
                for s in TRACK_STATES {
                    for m in TRACK_STATES {
                        let next =
                            compute_next_status(&settings(self_required, manager_required), s, m);
                        assert!(matches!(
                            next,
                            ReviewStatus::SelfReviewPending
                                | ReviewStatus::ManagerReviewPending
                                | ReviewStatus::PendingAcknowledgment
                        ));
                    }
                }
            }
        }
    }

    #[test]
    fn test_draft_never_advances_past_submitted_equivalent() {
        // Replacing a track's submission with a draft must never produce a
        // later status than the same track left empty.
        let order = |s: ReviewStatus| ALL_STATUSES.iter().position(|x| *x == s);
        for self_required in [true, false] {
            for manager_required in [true, false] {
                if !self_required && !manager_required {
                    continue;
                }
                let cfg = settings(self_required, manager_required);
                for other in TRACK_STATES {
                    let empty = compute_next_status(&cfg, Some(SubmissionStatus::Pending), other);
                    let draft =
                        compute_next_status(&cfg, Some(SubmissionStatus::InProgress), other);
                    assert_eq!(order(empty), order(draft));
                }
            }
        }
    }

    #[test]
    fn test_derive_status_initiated_until_first_save() {
        assert_eq!(
            derive_status(&settings(true, true), None, None, ReviewClosure::Open),
            ReviewStatus::Initiated
        );
        assert_eq!(
            derive_status(
                &settings(true, true),
                Some(SubmissionStatus::InProgress),
                None,
                ReviewClosure::Open
            ),
            ReviewStatus::SelfReviewPending
        );
    }

    #[test]
    fn test_derive_status_closure_overrides_tracks() {
        let cfg = settings(true, true);
        assert_eq!(
            derive_status(&cfg, None, None, ReviewClosure::Cancelled),
            ReviewStatus::Cancelled
        );
        assert_eq!(
            derive_status(
                &cfg,
                Some(SubmissionStatus::Submitted),
                Some(SubmissionStatus::Submitted),
                ReviewClosure::Acknowledged
            ),
            ReviewStatus::Acknowledged
        );
        assert_eq!(
            derive_status(
                &cfg,
                Some(SubmissionStatus::Submitted),
                Some(SubmissionStatus::Submitted),
                ReviewClosure::Completed
            ),
            ReviewStatus::Completed
        );
    }

    #[test]
    fn test_submission_window() {
        assert!(ReviewStatus::Initiated.validate_submission().is_ok());
        assert!(
            ReviewStatus::SelfReviewPending
                .validate_submission()
                .is_ok()
        );
        assert!(
            ReviewStatus::ManagerReviewPending
                .validate_submission()
                .is_ok()
        );
        for closed in [
            ReviewStatus::PendingAcknowledgment,
            ReviewStatus::Acknowledged,
            ReviewStatus::Completed,
            ReviewStatus::Cancelled,
        ] {
            assert!(closed.validate_submission().is_err());
        }
    }

    #[test]
    fn test_acknowledge_only_from_pending_acknowledgment() {
        for status in ALL_STATUSES {
            let result = status.validate_acknowledge();
            if status == ReviewStatus::PendingAcknowledgment {
                assert!(result.is_ok());
            } else {
                assert!(result.is_err(), "acknowledge allowed from {status}");
            }
        }
    }

    #[test]
    fn test_complete_only_from_acknowledged() {
        for status in ALL_STATUSES {
            assert_eq!(
                status.validate_complete().is_ok(),
                status == ReviewStatus::Acknowledged
            );
        }
    }

    #[test]
    fn test_cancel_and_delete_blocked_only_when_completed() {
        for status in ALL_STATUSES {
            let completed = status == ReviewStatus::Completed;
            assert_eq!(status.validate_cancel().is_err(), completed);
            assert_eq!(status.validate_delete().is_err(), completed);
        }
    }

    #[test]
    fn test_remind_blocked_when_terminal() {
        for status in ALL_STATUSES {
            assert_eq!(status.validate_remind().is_err(), status.is_terminal());
        }
    }

    #[test]
    fn test_rejection_names_status_and_operation() {
        let err = ReviewStatus::Initiated.validate_acknowledge().unwrap_err();
        match err {
            DomainError::InvalidStatusTransition {
                from, operation, ..
            } => {
                assert_eq!(from, "initiated");
                assert_eq!(operation, "acknowledge");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
