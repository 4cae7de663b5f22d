// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ad-hoc review queries.
//!
//! Rows are turned back into `AdhocReview` values here. The stored `status`
//! column is only used for filtering; the returned review derives its status
//! from the tracks and closure marker.

use diesel::SqliteConnection;
use diesel::prelude::*;
use perfdesk_domain::{AdhocReview, ReviewClosure, ReviewStatus, Submission, parse_due_date};
use tracing::debug;

use crate::data_models::{parse_optional_timestamp, parse_timestamp};
use crate::diesel_schema::adhoc_reviews;
use crate::error::PersistenceError;

/// Diesel Queryable struct for review rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = adhoc_reviews)]
pub(crate) struct ReviewRow {
    review_id: i64,
    employee_id: i64,
    manager_id: Option<i64>,
    triggered_by: i64,
    review_form_id: Option<String>,
    due_date: Option<String>,
    reason: Option<String>,
    last_reminder_sent_at: Option<String>,
    settings_json: String,
    self_review_json: Option<String>,
    manager_review_json: Option<String>,
    closure: String,
    acknowledged_at: Option<String>,
    acknowledgment_comments: Option<String>,
    employee_comments: Option<String>,
    completed_at: Option<String>,
    cancelled_at: Option<String>,
    version: i64,
    created_at: String,
    updated_at: String,
}

fn parse_submission(json: Option<&str>) -> Result<Option<Submission>, PersistenceError> {
    json.map(serde_json::from_str::<Submission>)
        .transpose()
        .map_err(PersistenceError::from)
}

impl TryFrom<ReviewRow> for AdhocReview {
    type Error = PersistenceError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        let closure: ReviewClosure = row
            .closure
            .parse()
            .map_err(|e: perfdesk_domain::DomainError| {
                PersistenceError::ReconstructionError(e.to_string())
            })?;
        let due_date = row
            .due_date
            .as_deref()
            .map(parse_due_date)
            .transpose()
            .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;

        Ok(Self {
            review_id: Some(row.review_id),
            employee_id: row.employee_id,
            manager_id: row.manager_id,
            triggered_by: row.triggered_by,
            review_form_id: row.review_form_id,
            due_date,
            reason: row.reason,
            last_reminder_sent_at: parse_optional_timestamp(row.last_reminder_sent_at.as_deref())?,
            settings: serde_json::from_str(&row.settings_json)?,
            self_review: parse_submission(row.self_review_json.as_deref())?,
            manager_review: parse_submission(row.manager_review_json.as_deref())?,
            closure,
            acknowledged_at: parse_optional_timestamp(row.acknowledged_at.as_deref())?,
            acknowledgment_comments: row.acknowledgment_comments,
            employee_comments: row.employee_comments,
            completed_at: parse_optional_timestamp(row.completed_at.as_deref())?,
            cancelled_at: parse_optional_timestamp(row.cancelled_at.as_deref())?,
            version: row.version,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

/// Retrieves a review by ID.
///
/// # Errors
///
/// Returns an error if the database query fails or the row is corrupt.
/// Returns `Ok(None)` if the review is not found.
pub fn get_review(
    conn: &mut SqliteConnection,
    review_id: i64,
) -> Result<Option<AdhocReview>, PersistenceError> {
    debug!(review_id, "Looking up review");

    adhoc_reviews::table
        .filter(adhoc_reviews::review_id.eq(review_id))
        .select(ReviewRow::as_select())
        .first(conn)
        .optional()?
        .map(AdhocReview::try_from)
        .transpose()
}

/// Lists reviews, newest first, optionally filtered by status and subject.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_reviews(
    conn: &mut SqliteConnection,
    status: Option<ReviewStatus>,
    employee_id: Option<i64>,
) -> Result<Vec<AdhocReview>, PersistenceError> {
    let mut query = adhoc_reviews::table
        .select(ReviewRow::as_select())
        .into_boxed();

    if let Some(status) = status {
        query = query.filter(adhoc_reviews::status.eq(status.as_str()));
    }
    if let Some(employee_id) = employee_id {
        query = query.filter(adhoc_reviews::employee_id.eq(employee_id));
    }

    let rows: Vec<ReviewRow> = query.order(adhoc_reviews::review_id.desc()).load(conn)?;
    debug!(count = rows.len(), "Loaded reviews");

    rows.into_iter().map(AdhocReview::try_from).collect()
}
