// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{TransitionResult, review_snapshot};
use perfdesk_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use perfdesk_domain::{
    AdhocReview, DomainError, Employee, ReviewClosure, ReviewStatus, Submission, validate_answers,
    validate_comments, validate_reason, validate_settings,
};
use time::OffsetDateTime;

/// Applies a `CreateReview` command for the given subject employee.
///
/// The subject must already exist; the caller loads it. When the command
/// names no manager, the subject's line manager is assigned.
///
/// # Arguments
///
/// * `subject` - The persisted employee under review
/// * `command` - Must be `Command::CreateReview`
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
/// * `now` - The transition timestamp
///
/// # Errors
///
/// Returns an error if:
/// - The command is not `CreateReview`
/// - The subject has no id
/// - Neither track is required
/// - The reason is invalid
/// - The subject is assigned as their own manager
pub fn apply_create(
    subject: &Employee,
    command: Command,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    let action_name: &'static str = command.action_name();
    let Command::CreateReview {
        manager_id,
        triggered_by,
        review_form_id,
        due_date,
        reason,
        settings,
    } = command
    else {
        return Err(CoreError::UnsupportedCommand(action_name));
    };

    let employee_id: i64 = subject
        .employee_id
        .ok_or(CoreError::MissingIdentity("Employee"))?;

    validate_settings(&settings)?;
    validate_reason(reason.as_deref())?;

    let manager_id: Option<i64> = manager_id.or(subject.manager_id);
    if manager_id == Some(employee_id) {
        return Err(CoreError::DomainViolation(DomainError::InvalidManager {
            employee_id,
            reason: String::from("an employee cannot review themselves as manager"),
        }));
    }

    let review: AdhocReview = AdhocReview::new(
        employee_id,
        manager_id,
        triggered_by,
        review_form_id,
        due_date,
        reason,
        settings,
        now,
    );

    let action: Action = Action::new(
        String::from("CreateReview"),
        Some(format!(
            "Created ad-hoc review for employee {employee_id} (manager: {})",
            manager_id.map_or_else(|| String::from("none"), |id| id.to_string())
        )),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        StateSnapshot::empty(),
        review_snapshot(&review),
        None,
        now,
    );

    Ok(TransitionResult {
        new_review: review,
        audit_event,
    })
}

/// Applies a lifecycle command to an existing review, producing the new
/// review and exactly one audit event.
///
/// Authorization is the caller's concern and must be checked first; this
/// function only enforces the state machine and field rules.
///
/// # Arguments
///
/// * `review` - The current review (immutable)
/// * `command` - The command to apply
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
/// * `now` - The transition timestamp
///
/// # Errors
///
/// Returns an error if:
/// - The review has no id
/// - The operation is not allowed in the review's current status
/// - The command's fields violate domain rules
/// - The command is `CreateReview` (use `apply_create`)
#[allow(clippy::too_many_lines)]
pub fn apply(
    review: &AdhocReview,
    command: Command,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    let review_id: i64 = review
        .review_id
        .ok_or(CoreError::MissingIdentity("Review"))?;
    let status: ReviewStatus = review.status();
    let action_name: &'static str = command.action_name();

    let mut new_review: AdhocReview = review.clone();

    let details: String = match command {
        Command::CreateReview { .. } => {
            return Err(CoreError::UnsupportedCommand(action_name));
        }
        Command::SubmitSelfReview {
            answers,
            status: submission_status,
            comments,
        } => {
            status.validate_submission()?;
            validate_answers(&answers)?;
            validate_comments("comments", comments.as_deref())?;

            let count: usize = answers.len();
            new_review.self_review = Some(Submission::record(answers, submission_status, now)?);
            if comments.is_some() {
                new_review.employee_comments = comments;
            }
            format!(
                "Self review saved as {} with {count} answers",
                submission_status.as_str()
            )
        }
        Command::SubmitManagerReview {
            answers,
            status: submission_status,
        } => {
            status.validate_submission()?;
            if review.manager_id.is_none() {
                return Err(CoreError::DomainViolation(DomainError::NoManagerAssigned(
                    review_id,
                )));
            }
            validate_answers(&answers)?;

            let count: usize = answers.len();
            new_review.manager_review =
                Some(Submission::record(answers, submission_status, now)?);
            format!(
                "Manager review saved as {} with {count} answers",
                submission_status.as_str()
            )
        }
        Command::Acknowledge { comments } => {
            status.validate_acknowledge()?;
            validate_comments("comments", comments.as_deref())?;

            new_review.closure = ReviewClosure::Acknowledged;
            new_review.acknowledged_at = Some(now);
            new_review.acknowledgment_comments = comments;
            String::from("Review acknowledged")
        }
        Command::Complete => {
            status.validate_complete()?;

            new_review.closure = ReviewClosure::Completed;
            new_review.completed_at = Some(now);
            String::from("Review completed")
        }
        Command::Cancel { reason } => {
            status.validate_cancel()?;
            validate_reason(reason.as_deref())?;

            new_review.closure = ReviewClosure::Cancelled;
            new_review.cancelled_at = review.cancelled_at.or(Some(now));
            reason.map_or_else(
                || String::from("Review cancelled"),
                |r| format!("Review cancelled: {r}"),
            )
        }
        Command::Remind => {
            status.validate_remind()?;

            new_review.last_reminder_sent_at = Some(now);
            format!("Reminder requested while {status}")
        }
        Command::Delete => {
            status.validate_delete()?;

            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                cause,
                Action::new(
                    String::from(action_name),
                    Some(format!("Deleted review in status {status}")),
                ),
                review_snapshot(review),
                StateSnapshot::empty(),
                Some(review_id),
                now,
            );
            return Ok(TransitionResult {
                new_review,
                audit_event,
            });
        }
    };

    new_review.updated_at = now;
    new_review.version = review.version + 1;

    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        Action::new(String::from(action_name), Some(details)),
        review_snapshot(review),
        review_snapshot(&new_review),
        Some(review_id),
        now,
    );

    Ok(TransitionResult {
        new_review,
        audit_event,
    })
}
