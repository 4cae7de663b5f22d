// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use perfdesk_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};

use crate::data_models::{ActionData, ActorData, CauseData, StateSnapshotData, parse_timestamp};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

/// Diesel Queryable struct for audit event rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = audit_events)]
struct AuditEventRow {
    event_id: i64,
    review_id: Option<i64>,
    actor_json: String,
    cause_json: String,
    action_json: String,
    before_snapshot_json: String,
    after_snapshot_json: String,
    created_at: String,
}

impl TryFrom<AuditEventRow> for AuditEvent {
    type Error = PersistenceError;

    fn try_from(row: AuditEventRow) -> Result<Self, Self::Error> {
        let actor: ActorData = serde_json::from_str(&row.actor_json)?;
        let cause: CauseData = serde_json::from_str(&row.cause_json)?;
        let action: ActionData = serde_json::from_str(&row.action_json)?;
        let before: StateSnapshotData = serde_json::from_str(&row.before_snapshot_json)?;
        let after: StateSnapshotData = serde_json::from_str(&row.after_snapshot_json)?;

        Ok(Self::new(
            Actor::new(actor.id, actor.actor_type),
            Cause::new(cause.id, cause.description),
            Action::new(action.name, action.details),
            StateSnapshot::new(before.data),
            StateSnapshot::new(after.data),
            row.review_id,
            parse_timestamp(&row.created_at)?,
        )
        .with_event_id(row.event_id))
    }
}

/// Retrieves the audit trail of a review in the order it was recorded.
///
/// Events survive the review's deletion.
///
/// # Errors
///
/// Returns an error if the query fails or an event cannot be deserialized.
pub fn get_review_history(
    conn: &mut SqliteConnection,
    review_id: i64,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    audit_events::table
        .filter(audit_events::review_id.eq(review_id))
        .select(AuditEventRow::as_select())
        .order(audit_events::event_id.asc())
        .load(conn)?
        .into_iter()
        .map(AuditEvent::try_from)
        .collect()
}

/// Counts all audit events.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_audit_events(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(audit_events::table.count().get_result(conn)?)
}
