// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use perfdesk_audit::{AuditEvent, StateSnapshot};
use perfdesk_domain::{AdhocReview, SubmissionStatus};

fn track_label(status: Option<SubmissionStatus>) -> &'static str {
    status.map_or("none", |s| s.as_str())
}

/// Converts a review to a snapshot for audit purposes.
#[must_use]
pub fn review_snapshot(review: &AdhocReview) -> StateSnapshot {
    StateSnapshot::new(format!(
        "status={},self_review={},manager_review={},manager_id={},version={}",
        review.status(),
        track_label(review.self_review_status()),
        track_label(review.manager_review_status()),
        review
            .manager_id
            .map_or_else(|| String::from("none"), |id| id.to_string()),
        review.version
    ))
}

/// The result of a successful state transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The review after the transition.
    ///
    /// For a delete this is the review as it was; the caller removes it.
    pub new_review: AdhocReview,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}
