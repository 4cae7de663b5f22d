// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Requests accept `snake_case` field names and their `camelCase` aliases.
//! Responses are `camelCase`.

use perfdesk_audit::AuditEvent;
use perfdesk_domain::{AdhocReview, Answer, Employee, ReviewSettings, Submission, SubmissionStatus};
use time::OffsetDateTime;

use crate::auth::{Principal, TokenPair};

// ============================================================================
// Reviews
// ============================================================================

/// API request to trigger an ad-hoc review.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateReviewRequest {
    /// The employee under review.
    #[serde(alias = "employeeId")]
    pub employee_id: i64,
    /// The reviewing manager; defaults to the employee's line manager.
    #[serde(default, alias = "managerId")]
    pub manager_id: Option<i64>,
    /// Due date as `YYYY-MM-DD`.
    #[serde(default, alias = "dueDate")]
    pub due_date: Option<String>,
    /// Why the review was triggered.
    #[serde(default)]
    pub reason: Option<String>,
    /// Review form template identifier.
    #[serde(default, alias = "reviewFormId")]
    pub review_form_id: Option<String>,
    /// Track requirements; every flag defaults to `true`.
    #[serde(default)]
    pub settings: Option<ReviewSettings>,
}

/// API request to save or submit a review track.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SubmitReviewRequest {
    /// The complete answer set; replaces any earlier answers.
    pub answers: Vec<Answer>,
    /// `in_progress` for a draft, `submitted` to finalise.
    pub status: SubmissionStatus,
    /// Employee comments; only used for the self review.
    #[serde(default)]
    pub comments: Option<String>,
}

/// API request to acknowledge a review.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AcknowledgeReviewRequest {
    /// Optional acknowledgment comments.
    #[serde(default)]
    pub comments: Option<String>,
}

/// API request to cancel a review.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CancelReviewRequest {
    /// Optional cancellation reason, recorded in the audit trail.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Query parameters for listing reviews.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListReviewsQuery {
    /// Only reviews in this aggregate status.
    #[serde(default)]
    pub status: Option<String>,
    /// Only reviews of this employee.
    #[serde(default, alias = "employeeId")]
    pub employee_id: Option<i64>,
}

/// A review as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewInfo {
    pub id: i64,
    pub employee_id: i64,
    pub manager_id: Option<i64>,
    pub triggered_by: i64,
    pub review_form_id: Option<String>,
    /// Due date as `YYYY-MM-DD`.
    pub due_date: Option<String>,
    pub reason: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_reminder_sent_at: Option<OffsetDateTime>,
    pub settings: ReviewSettings,
    pub self_review: Option<Submission>,
    pub manager_review: Option<Submission>,
    /// The aggregate lifecycle status.
    pub status: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub acknowledged_at: Option<OffsetDateTime>,
    pub acknowledgment_comments: Option<String>,
    pub employee_comments: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub cancelled_at: Option<OffsetDateTime>,
    /// Revision counter; increases with every change.
    pub version: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl ReviewInfo {
    /// Builds the response view of a persisted review.
    ///
    /// Unpersisted reviews report id 0.
    #[must_use]
    pub fn from_review(review: &AdhocReview) -> Self {
        Self {
            id: review.review_id.unwrap_or_default(),
            employee_id: review.employee_id,
            manager_id: review.manager_id,
            triggered_by: review.triggered_by,
            review_form_id: review.review_form_id.clone(),
            due_date: review.due_date.map(|d| d.to_string()),
            reason: review.reason.clone(),
            last_reminder_sent_at: review.last_reminder_sent_at,
            settings: review.settings,
            self_review: review.self_review.clone(),
            manager_review: review.manager_review.clone(),
            status: review.status().as_str().to_string(),
            acknowledged_at: review.acknowledged_at,
            acknowledgment_comments: review.acknowledgment_comments.clone(),
            employee_comments: review.employee_comments.clone(),
            completed_at: review.completed_at,
            cancelled_at: review.cancelled_at,
            version: review.version,
            created_at: review.created_at,
            updated_at: review.updated_at,
        }
    }
}

/// API response for a self review submission.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfReviewResponse {
    pub id: i64,
    /// The aggregate status after the submission.
    pub status: String,
    pub self_review: Option<Submission>,
}

/// API response for a manager review submission.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerReviewResponse {
    pub id: i64,
    /// The aggregate status after the submission.
    pub status: String,
    pub manager_review: Option<Submission>,
}

/// API response for a deleted review.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteReviewResponse {
    pub id: i64,
    pub deleted: bool,
}

/// One entry of a review's audit trail.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEventInfo {
    pub event_id: i64,
    pub review_id: Option<i64>,
    pub action: String,
    pub details: Option<String>,
    pub actor_id: String,
    pub actor_type: String,
    pub cause_id: String,
    pub cause_description: String,
    /// State summary before the action.
    pub before: String,
    /// State summary after the action.
    pub after: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl AuditEventInfo {
    /// Builds the response view of a stored audit event.
    #[must_use]
    pub fn from_event(event: &AuditEvent) -> Self {
        Self {
            event_id: event.event_id.unwrap_or_default(),
            review_id: event.review_id,
            action: event.action.name.clone(),
            details: event.action.details.clone(),
            actor_id: event.actor.id.clone(),
            actor_type: event.actor.actor_type.clone(),
            cause_id: event.cause.id.clone(),
            cause_description: event.cause.description.clone(),
            before: event.before.data.clone(),
            after: event.after.data.clone(),
            created_at: event.created_at,
        }
    }
}

// ============================================================================
// Employees
// ============================================================================

/// API request to add an employee to the directory.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateEmployeeRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub department: Option<String>,
    /// The employee's line manager.
    #[serde(default, alias = "managerId")]
    pub manager_id: Option<i64>,
}

/// An employee as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInfo {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub department: Option<String>,
    pub manager_id: Option<i64>,
}

impl EmployeeInfo {
    /// Builds the response view of a persisted employee.
    #[must_use]
    pub fn from_employee(employee: &Employee) -> Self {
        Self {
            id: employee.employee_id.unwrap_or_default(),
            name: employee.name.clone(),
            email: employee.email.clone(),
            department: employee.department.clone(),
            manager_id: employee.manager_id,
        }
    }
}

// ============================================================================
// Accounts and authentication
// ============================================================================

/// API request to create the first administrator.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BootstrapRequest {
    pub email: String,
    pub password: String,
}

/// API request to create an account.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateAccountRequest {
    pub email: String,
    pub password: String,
    /// One of `admin`, `hr`, `manager`, `employee`.
    pub role: String,
    /// The employee record this account acts as.
    #[serde(default, alias = "employeeId")]
    pub employee_id: Option<i64>,
}

/// API request to enable or disable an account.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SetAccountStatusRequest {
    /// `true` blocks login and refresh for the account.
    pub disabled: bool,
}

/// API response for an account status change.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStatusResponse {
    pub id: i64,
    pub disabled: bool,
}

/// An account as returned by the API. Never carries credentials.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub id: i64,
    pub email: String,
    pub role: String,
    pub employee_id: Option<i64>,
}

impl AccountInfo {
    /// Builds the account view of an authenticated principal.
    #[must_use]
    pub fn from_principal(principal: &Principal) -> Self {
        Self {
            id: principal.account_id,
            email: principal.email.clone(),
            role: principal.role.as_str().to_string(),
            employee_id: principal.employee_id,
        }
    }
}

/// API request to log in.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// API request carrying a refresh token, for refresh and logout.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RefreshRequest {
    #[serde(alias = "refreshToken")]
    pub refresh_token: String,
}

/// API response carrying a new token pair.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Always `Bearer`.
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub account: AccountInfo,
}

impl TokenResponse {
    /// Builds the response for an issued token pair.
    #[must_use]
    pub fn new(pair: TokenPair, principal: &Principal) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: String::from("Bearer"),
            expires_in: pair.expires_in,
            account: AccountInfo::from_principal(principal),
        }
    }
}
