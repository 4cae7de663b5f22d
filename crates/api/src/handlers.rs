// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Every review operation follows the same order: load the review,
//! authorize the caller, apply the command, persist the result and its
//! audit event together.

use perfdesk::{Command, TransitionResult, apply, apply_create};
use perfdesk_audit::{AuditEvent, Cause};
use perfdesk_domain::{
    AdhocReview, DomainError, Employee, ReviewStatus, Role, parse_due_date, validate_email,
    validate_employee_fields,
};
use perfdesk_persistence::SqlitePersistence;
use time::{Date, OffsetDateTime};
use tracing::{debug, info};

use crate::auth::{AuthConfig, AuthenticationService, AuthorizationService, Principal};
use crate::error::{
    ApiError, AuthError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    AccountInfo, AccountStatusResponse, AcknowledgeReviewRequest, AuditEventInfo, BootstrapRequest,
    CancelReviewRequest, CreateAccountRequest, CreateEmployeeRequest, CreateReviewRequest,
    DeleteReviewResponse, EmployeeInfo, ListReviewsQuery, LoginRequest, ManagerReviewResponse,
    RefreshRequest, ReviewInfo, SelfReviewResponse, SetAccountStatusRequest, SubmitReviewRequest,
    TokenResponse,
};

/// The result of a review operation that includes both the response and
/// the audit event it recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResult<T> {
    /// The API response.
    pub response: T,
    /// The review after the operation. For deletes, the review as it was.
    pub review: AdhocReview,
    /// The audit event generated by this operation.
    pub audit_event: AuditEvent,
}

type Authorize = fn(&Principal, &AdhocReview) -> Result<(), AuthError>;

fn load_review(
    persistence: &mut SqlitePersistence,
    review_id: i64,
) -> Result<AdhocReview, ApiError> {
    persistence
        .get_review(review_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| {
            translate_domain_error(DomainError::ReviewNotFound(review_id))
        })
}

fn load_employee(
    persistence: &mut SqlitePersistence,
    employee_id: i64,
) -> Result<Employee, ApiError> {
    persistence
        .get_employee(employee_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| {
            translate_domain_error(DomainError::EmployeeNotFound(employee_id))
        })
}

/// Loads, authorizes, applies and persists one lifecycle command.
fn transition_review(
    persistence: &mut SqlitePersistence,
    review_id: i64,
    principal: &Principal,
    authorize: Authorize,
    command: Command,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<(AdhocReview, AuditEvent), ApiError> {
    let review: AdhocReview = load_review(persistence, review_id)?;
    authorize(principal, &review)?;

    let result: TransitionResult = apply(
        &review,
        command,
        principal.to_audit_actor(),
        cause,
        now,
    )
    .map_err(translate_core_error)?;

    let stored: AdhocReview = persistence
        .update_review(review.version, &result)
        .map_err(translate_persistence_error)?;

    Ok((stored, result.audit_event))
}

// ============================================================================
// Reviews
// ============================================================================

/// Triggers an ad-hoc review for an employee.
///
/// # Errors
///
/// Returns an error if:
/// - The caller's role may not initiate reviews
/// - The employee or the named manager does not exist
/// - The settings, reason or due date are invalid
pub fn create_review(
    persistence: &mut SqlitePersistence,
    request: CreateReviewRequest,
    principal: &Principal,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<ApiResult<ReviewInfo>, ApiError> {
    AuthorizationService::authorize_create_review(principal)?;

    let subject: Employee = load_employee(persistence, request.employee_id)?;
    if let Some(manager_id) = request.manager_id {
        load_employee(persistence, manager_id)?;
    }

    let due_date: Option<Date> = request
        .due_date
        .as_deref()
        .map(parse_due_date)
        .transpose()
        .map_err(translate_domain_error)?;

    let command: Command = Command::CreateReview {
        manager_id: request.manager_id,
        triggered_by: principal.account_id,
        review_form_id: request.review_form_id,
        due_date,
        reason: request.reason,
        settings: request.settings.unwrap_or_default(),
    };

    let result: TransitionResult = apply_create(
        &subject,
        command,
        principal.to_audit_actor(),
        cause,
        now,
    )
    .map_err(translate_core_error)?;

    let review: AdhocReview = persistence
        .create_review(&result)
        .map_err(translate_persistence_error)?;

    Ok(ApiResult {
        response: ReviewInfo::from_review(&review),
        audit_event: result.audit_event,
        review,
    })
}

/// Lists the reviews visible to the caller, newest first.
///
/// # Errors
///
/// Returns an error if the status filter is not a known status.
pub fn list_reviews(
    persistence: &mut SqlitePersistence,
    query: &ListReviewsQuery,
    principal: &Principal,
) -> Result<Vec<ReviewInfo>, ApiError> {
    let status: Option<ReviewStatus> = query
        .status
        .as_deref()
        .map(str::parse::<ReviewStatus>)
        .transpose()
        .map_err(translate_domain_error)?;

    let reviews: Vec<AdhocReview> = persistence
        .list_reviews(status, query.employee_id)
        .map_err(translate_persistence_error)?;

    let visible: Vec<ReviewInfo> = reviews
        .iter()
        .filter(|review| AuthorizationService::authorize_view_review(principal, review).is_ok())
        .map(ReviewInfo::from_review)
        .collect();

    debug!(
        account_id = principal.account_id,
        total = reviews.len(),
        visible = visible.len(),
        "Listed reviews"
    );
    Ok(visible)
}

/// Returns one review.
///
/// # Errors
///
/// Returns an error if the review does not exist or the caller may not see it.
pub fn get_review(
    persistence: &mut SqlitePersistence,
    review_id: i64,
    principal: &Principal,
) -> Result<ReviewInfo, ApiError> {
    let review: AdhocReview = load_review(persistence, review_id)?;
    AuthorizationService::authorize_view_review(principal, &review)?;
    Ok(ReviewInfo::from_review(&review))
}

/// Saves or submits the self review track.
///
/// # Errors
///
/// Returns an error if the caller is not the subject, the review no longer
/// accepts submissions, or the answers are invalid.
pub fn submit_self_review(
    persistence: &mut SqlitePersistence,
    review_id: i64,
    request: SubmitReviewRequest,
    principal: &Principal,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<ApiResult<SelfReviewResponse>, ApiError> {
    let (review, audit_event) = transition_review(
        persistence,
        review_id,
        principal,
        AuthorizationService::authorize_submit_self_review,
        Command::SubmitSelfReview {
            answers: request.answers,
            status: request.status,
            comments: request.comments,
        },
        cause,
        now,
    )?;

    info!(review_id, status = %review.status(), "Self review saved");
    Ok(ApiResult {
        response: SelfReviewResponse {
            id: review_id,
            status: review.status().as_str().to_string(),
            self_review: review.self_review.clone(),
        },
        review,
        audit_event,
    })
}

/// Saves or submits the manager review track.
///
/// # Errors
///
/// Returns an error if the caller is not the assigned manager, the review no
/// longer accepts submissions, or the answers are invalid.
pub fn submit_manager_review(
    persistence: &mut SqlitePersistence,
    review_id: i64,
    request: SubmitReviewRequest,
    principal: &Principal,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<ApiResult<ManagerReviewResponse>, ApiError> {
    let (review, audit_event) = transition_review(
        persistence,
        review_id,
        principal,
        AuthorizationService::authorize_submit_manager_review,
        Command::SubmitManagerReview {
            answers: request.answers,
            status: request.status,
        },
        cause,
        now,
    )?;

    info!(review_id, status = %review.status(), "Manager review saved");
    Ok(ApiResult {
        response: ManagerReviewResponse {
            id: review_id,
            status: review.status().as_str().to_string(),
            manager_review: review.manager_review.clone(),
        },
        review,
        audit_event,
    })
}

fn review_result(review: AdhocReview, audit_event: AuditEvent) -> ApiResult<ReviewInfo> {
    ApiResult {
        response: ReviewInfo::from_review(&review),
        review,
        audit_event,
    }
}

/// Acknowledges a review awaiting acknowledgment.
///
/// # Errors
///
/// Returns an error if the caller may not acknowledge or the review is not
/// pending acknowledgment.
pub fn acknowledge_review(
    persistence: &mut SqlitePersistence,
    review_id: i64,
    request: AcknowledgeReviewRequest,
    principal: &Principal,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<ApiResult<ReviewInfo>, ApiError> {
    let (review, audit_event) = transition_review(
        persistence,
        review_id,
        principal,
        AuthorizationService::authorize_acknowledge,
        Command::Acknowledge {
            comments: request.comments,
        },
        cause,
        now,
    )?;
    Ok(review_result(review, audit_event))
}

/// Completes an acknowledged review.
///
/// # Errors
///
/// Returns an error if the caller is not admin/hr or the review is not
/// acknowledged.
pub fn complete_review(
    persistence: &mut SqlitePersistence,
    review_id: i64,
    principal: &Principal,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<ApiResult<ReviewInfo>, ApiError> {
    let (review, audit_event) = transition_review(
        persistence,
        review_id,
        principal,
        |principal, _| AuthorizationService::authorize_complete(principal),
        Command::Complete,
        cause,
        now,
    )?;
    Ok(review_result(review, audit_event))
}

/// Cancels a review that has not been completed.
///
/// # Errors
///
/// Returns an error if the caller may not cancel or the review is completed.
pub fn cancel_review(
    persistence: &mut SqlitePersistence,
    review_id: i64,
    request: CancelReviewRequest,
    principal: &Principal,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<ApiResult<ReviewInfo>, ApiError> {
    let (review, audit_event) = transition_review(
        persistence,
        review_id,
        principal,
        AuthorizationService::authorize_cancel,
        Command::Cancel {
            reason: request.reason,
        },
        cause,
        now,
    )?;
    Ok(review_result(review, audit_event))
}

/// Records a reminder request for an open review.
///
/// Delivery is left to subscribers of the live event stream.
///
/// # Errors
///
/// Returns an error if the caller may not send reminders or the review is
/// completed or cancelled.
pub fn remind_review(
    persistence: &mut SqlitePersistence,
    review_id: i64,
    principal: &Principal,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<ApiResult<ReviewInfo>, ApiError> {
    let (review, audit_event) = transition_review(
        persistence,
        review_id,
        principal,
        AuthorizationService::authorize_remind,
        Command::Remind,
        cause,
        now,
    )?;
    Ok(review_result(review, audit_event))
}

/// Deletes a review that has not been completed. Its audit trail is kept.
///
/// # Errors
///
/// Returns an error if the caller is not admin/hr or the review is completed.
pub fn delete_review(
    persistence: &mut SqlitePersistence,
    review_id: i64,
    principal: &Principal,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<ApiResult<DeleteReviewResponse>, ApiError> {
    let review: AdhocReview = load_review(persistence, review_id)?;
    AuthorizationService::authorize_delete(principal)?;

    let result: TransitionResult = apply(
        &review,
        Command::Delete,
        principal.to_audit_actor(),
        cause,
        now,
    )
    .map_err(translate_core_error)?;

    persistence
        .delete_review(review.version, &result)
        .map_err(translate_persistence_error)?;

    Ok(ApiResult {
        response: DeleteReviewResponse {
            id: review_id,
            deleted: true,
        },
        review,
        audit_event: result.audit_event,
    })
}

/// Returns the audit trail of a review, oldest first.
///
/// The trail of a deleted review is only visible to admin and HR.
///
/// # Errors
///
/// Returns an error if the review is unknown to the caller or not visible.
pub fn get_review_history(
    persistence: &mut SqlitePersistence,
    review_id: i64,
    principal: &Principal,
) -> Result<Vec<AuditEventInfo>, ApiError> {
    let review: Option<AdhocReview> = persistence
        .get_review(review_id)
        .map_err(translate_persistence_error)?;

    match &review {
        Some(review) => AuthorizationService::authorize_view_review(principal, review)?,
        None if principal.role.is_review_administrator() => {}
        None => {
            return Err(translate_domain_error(
                DomainError::ReviewNotFound(review_id),
            ));
        }
    }

    let events: Vec<AuditEvent> = persistence
        .get_review_history(review_id)
        .map_err(translate_persistence_error)?;

    if events.is_empty() {
        return Err(translate_domain_error(
            DomainError::ReviewNotFound(review_id),
        ));
    }

    Ok(events.iter().map(AuditEventInfo::from_event).collect())
}

// ============================================================================
// Employees
// ============================================================================

/// Adds an employee to the directory.
///
/// # Errors
///
/// Returns an error if the caller is not admin/hr, a field is invalid, the
/// manager does not exist or the e-mail is taken.
pub fn create_employee(
    persistence: &mut SqlitePersistence,
    request: CreateEmployeeRequest,
    principal: &Principal,
    now: OffsetDateTime,
) -> Result<EmployeeInfo, ApiError> {
    AuthorizationService::authorize_manage_employees(principal)?;

    let employee: Employee = Employee::new(
        request.name,
        request.email,
        request.department,
        request.manager_id,
    );
    validate_employee_fields(&employee).map_err(translate_domain_error)?;

    if let Some(manager_id) = employee.manager_id {
        load_employee(persistence, manager_id)?;
    }

    let employee_id: i64 = persistence
        .create_employee(&employee, now)
        .map_err(translate_persistence_error)?;
    let stored: Employee = load_employee(persistence, employee_id)?;

    info!(
        employee_id,
        created_by = principal.account_id,
        "Employee added to directory"
    );
    Ok(EmployeeInfo::from_employee(&stored))
}

/// Returns one employee.
///
/// # Errors
///
/// Returns an error if the employee does not exist.
pub fn get_employee(
    persistence: &mut SqlitePersistence,
    employee_id: i64,
) -> Result<EmployeeInfo, ApiError> {
    let employee: Employee = load_employee(persistence, employee_id)?;
    Ok(EmployeeInfo::from_employee(&employee))
}

/// Lists the employee directory.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_employees(persistence: &mut SqlitePersistence) -> Result<Vec<EmployeeInfo>, ApiError> {
    let employees: Vec<Employee> = persistence
        .list_employees()
        .map_err(translate_persistence_error)?;
    Ok(employees
        .iter()
        .map(EmployeeInfo::from_employee)
        .collect())
}

// ============================================================================
// Accounts and authentication
// ============================================================================

/// Creates the first administrator account.
///
/// Only possible while no account exists.
///
/// # Errors
///
/// Returns an error if accounts already exist, the e-mail is malformed or
/// the password violates the policy.
pub fn bootstrap(
    persistence: &mut SqlitePersistence,
    request: &BootstrapRequest,
    now: OffsetDateTime,
) -> Result<AccountInfo, ApiError> {
    validate_email(&request.email).map_err(translate_domain_error)?;
    PasswordPolicy::default().validate(&request.password, &request.email)?;

    let account_id: i64 = persistence
        .bootstrap_admin(&request.email, &request.password, now)
        .map_err(translate_persistence_error)?;

    info!(account_id, "Bootstrapped first administrator");
    Ok(AccountInfo {
        id: account_id,
        email: request.email.trim().to_lowercase(),
        role: Role::Admin.as_str().to_string(),
        employee_id: None,
    })
}

/// Creates an account.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, the role, e-mail or
/// password is invalid, the employee does not exist or the e-mail is taken.
pub fn create_account(
    persistence: &mut SqlitePersistence,
    request: &CreateAccountRequest,
    principal: &Principal,
    now: OffsetDateTime,
) -> Result<AccountInfo, ApiError> {
    AuthorizationService::authorize_create_account(principal)?;

    let role: Role = request.role.parse().map_err(translate_domain_error)?;
    validate_email(&request.email).map_err(translate_domain_error)?;
    PasswordPolicy::default().validate(&request.password, &request.email)?;

    if let Some(employee_id) = request.employee_id {
        load_employee(persistence, employee_id)?;
    }

    let account_id: i64 = persistence
        .create_account(
            &request.email,
            &request.password,
            role,
            request.employee_id,
            now,
        )
        .map_err(translate_persistence_error)?;

    info!(
        account_id,
        role = %role,
        created_by = principal.account_id,
        "Account created"
    );
    Ok(AccountInfo {
        id: account_id,
        email: request.email.trim().to_lowercase(),
        role: role.as_str().to_string(),
        employee_id: request.employee_id,
    })
}

/// Enables or disables an account.
///
/// A disabled account can neither log in nor refresh its tokens. Access
/// tokens already issued stay valid until they expire.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, tries to disable their
/// own account, or the account does not exist.
pub fn set_account_status(
    persistence: &mut SqlitePersistence,
    account_id: i64,
    request: &SetAccountStatusRequest,
    principal: &Principal,
) -> Result<AccountStatusResponse, ApiError> {
    AuthorizationService::authorize_set_account_status(principal)?;

    if request.disabled && account_id == principal.account_id {
        return Err(ApiError::invalid(
            "disabled",
            String::from("an administrator cannot disable their own account"),
        ));
    }

    persistence
        .set_account_disabled(account_id, request.disabled)
        .map_err(translate_persistence_error)?;

    info!(
        account_id,
        disabled = request.disabled,
        changed_by = principal.account_id,
        "Account status changed"
    );
    Ok(AccountStatusResponse {
        id: account_id,
        disabled: request.disabled,
    })
}

/// Logs in with e-mail and password.
///
/// # Errors
///
/// Returns an error if the credentials are wrong or the account is locked
/// or disabled.
pub fn login(
    persistence: &mut SqlitePersistence,
    config: &AuthConfig,
    request: &LoginRequest,
    now: OffsetDateTime,
) -> Result<TokenResponse, ApiError> {
    let (pair, principal) =
        AuthenticationService::login(persistence, config, &request.email, &request.password, now)?;
    Ok(TokenResponse::new(pair, &principal))
}

/// Exchanges a refresh token for a new token pair.
///
/// # Errors
///
/// Returns an error if the refresh token is invalid, expired or reused.
pub fn refresh(
    persistence: &mut SqlitePersistence,
    config: &AuthConfig,
    request: &RefreshRequest,
    now: OffsetDateTime,
) -> Result<TokenResponse, ApiError> {
    let (pair, principal) =
        AuthenticationService::refresh(persistence, config, &request.refresh_token, now)?;
    Ok(TokenResponse::new(pair, &principal))
}

/// Logs out by revoking the refresh token's family.
///
/// # Errors
///
/// Returns an error if the refresh token is invalid.
pub fn logout(
    persistence: &mut SqlitePersistence,
    request: &RefreshRequest,
    now: OffsetDateTime,
) -> Result<(), ApiError> {
    AuthenticationService::logout(persistence, &request.refresh_token, now)?;
    Ok(())
}

/// Returns the caller's identity.
#[must_use]
pub fn whoami(principal: &Principal) -> AccountInfo {
    AccountInfo::from_principal(principal)
}
