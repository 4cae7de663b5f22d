// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ad-hoc review mutations.
//!
//! Every write persists the transition's audit event in the same
//! transaction. Updates and deletes are conditioned on the version the
//! caller read; a mismatch means another writer got there first.

use diesel::SqliteConnection;
use diesel::prelude::*;
use perfdesk::TransitionResult;
use perfdesk_audit::AuditEvent;
use perfdesk_domain::{AdhocReview, Submission};
use tracing::{info, warn};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{format_due_date, format_optional_timestamp, format_timestamp};
use crate::diesel_schema::adhoc_reviews;
use crate::error::PersistenceError;
use crate::mutations::audit::persist_audit_event;

fn submission_json(submission: Option<&Submission>) -> Result<Option<String>, PersistenceError> {
    submission
        .map(serde_json::to_string)
        .transpose()
        .map_err(PersistenceError::from)
}

fn require_review_id(review: &AdhocReview) -> Result<i64, PersistenceError> {
    review
        .review_id
        .ok_or_else(|| PersistenceError::Other(String::from("Review has no id")))
}

/// Inserts a newly created review together with its creation event.
///
/// # Returns
///
/// The review with its assigned id.
///
/// # Errors
///
/// Returns an error if the subject, manager or initiator does not exist or
/// the insert fails.
pub fn create_review(
    conn: &mut SqliteConnection,
    result: &TransitionResult,
) -> Result<AdhocReview, PersistenceError> {
    let review: &AdhocReview = &result.new_review;

    conn.transaction(|conn| {
        diesel::insert_into(adhoc_reviews::table)
            .values((
                adhoc_reviews::employee_id.eq(review.employee_id),
                adhoc_reviews::manager_id.eq(review.manager_id),
                adhoc_reviews::triggered_by.eq(review.triggered_by),
                adhoc_reviews::review_form_id.eq(review.review_form_id.as_deref()),
                adhoc_reviews::due_date.eq(review.due_date.map(format_due_date).transpose()?),
                adhoc_reviews::reason.eq(review.reason.as_deref()),
                adhoc_reviews::settings_json.eq(serde_json::to_string(&review.settings)?),
                adhoc_reviews::self_review_json.eq(submission_json(review.self_review.as_ref())?),
                adhoc_reviews::manager_review_json
                    .eq(submission_json(review.manager_review.as_ref())?),
                adhoc_reviews::closure.eq(review.closure.as_str()),
                adhoc_reviews::status.eq(review.status().as_str()),
                adhoc_reviews::version.eq(review.version),
                adhoc_reviews::created_at.eq(format_timestamp(review.created_at)?),
                adhoc_reviews::updated_at.eq(format_timestamp(review.updated_at)?),
            ))
            .execute(conn)?;

        let review_id: i64 = get_last_insert_rowid(conn)?;
        let event: AuditEvent = result.audit_event.clone().with_review_id(review_id);
        persist_audit_event(conn, &event)?;

        info!(
            review_id,
            employee_id = review.employee_id,
            triggered_by = review.triggered_by,
            "Review created"
        );

        let mut created: AdhocReview = review.clone();
        created.review_id = Some(review_id);
        Ok(created)
    })
}

/// Writes a lifecycle transition and its audit event.
///
/// The row is only updated if its version still matches the version of the
/// review the transition was computed from.
///
/// # Arguments
///
/// * `expected_version` - The version the caller read
/// * `result` - The transition to persist
///
/// # Returns
///
/// The stored review with its incremented version.
///
/// # Errors
///
/// Returns `PersistenceError::StaleVersion` if the row changed since it
/// was read or no longer exists.
pub fn update_review(
    conn: &mut SqliteConnection,
    expected_version: i64,
    result: &TransitionResult,
) -> Result<AdhocReview, PersistenceError> {
    let review: &AdhocReview = &result.new_review;
    let review_id: i64 = require_review_id(review)?;
    let next_version: i64 = expected_version + 1;

    conn.transaction(|conn| {
        let rows: usize = diesel::update(adhoc_reviews::table)
            .filter(adhoc_reviews::review_id.eq(review_id))
            .filter(adhoc_reviews::version.eq(expected_version))
            .set((
                adhoc_reviews::manager_id.eq(review.manager_id),
                adhoc_reviews::last_reminder_sent_at
                    .eq(format_optional_timestamp(review.last_reminder_sent_at)?),
                adhoc_reviews::self_review_json.eq(submission_json(review.self_review.as_ref())?),
                adhoc_reviews::manager_review_json
                    .eq(submission_json(review.manager_review.as_ref())?),
                adhoc_reviews::closure.eq(review.closure.as_str()),
                adhoc_reviews::status.eq(review.status().as_str()),
                adhoc_reviews::acknowledged_at
                    .eq(format_optional_timestamp(review.acknowledged_at)?),
                adhoc_reviews::acknowledgment_comments
                    .eq(review.acknowledgment_comments.as_deref()),
                adhoc_reviews::employee_comments.eq(review.employee_comments.as_deref()),
                adhoc_reviews::completed_at.eq(format_optional_timestamp(review.completed_at)?),
                adhoc_reviews::cancelled_at.eq(format_optional_timestamp(review.cancelled_at)?),
                adhoc_reviews::version.eq(next_version),
                adhoc_reviews::updated_at.eq(format_timestamp(review.updated_at)?),
            ))
            .execute(conn)?;

        if rows == 0 {
            warn!(
                review_id,
                expected_version,
                "Review write lost a version race"
            );
            return Err(PersistenceError::StaleVersion {
                review_id,
                expected_version,
            });
        }

        persist_audit_event(conn, &result.audit_event)?;

        info!(
            review_id,
            version = next_version,
            status = %review.status(),
            action = %result.audit_event.action.name,
            "Review updated"
        );

        let mut updated: AdhocReview = review.clone();
        updated.version = next_version;
        Ok(updated)
    })
}

/// Deletes a review, keeping its audit trail.
///
/// # Errors
///
/// Returns `PersistenceError::StaleVersion` if the row changed since it
/// was read or no longer exists.
pub fn delete_review(
    conn: &mut SqliteConnection,
    expected_version: i64,
    result: &TransitionResult,
) -> Result<(), PersistenceError> {
    let review_id: i64 = require_review_id(&result.new_review)?;

    conn.transaction(|conn| {
        let rows: usize = diesel::delete(
            adhoc_reviews::table
                .filter(adhoc_reviews::review_id.eq(review_id))
                .filter(adhoc_reviews::version.eq(expected_version)),
        )
        .execute(conn)?;

        if rows == 0 {
            return Err(PersistenceError::StaleVersion {
                review_id,
                expected_version,
            });
        }

        persist_audit_event(conn, &result.audit_event)?;
        info!(review_id, "Review deleted");
        Ok(())
    })
}
