// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use perfdesk::CoreError;
use perfdesk_domain::DomainError;
use perfdesk_persistence::PersistenceError;
use thiserror::Error;

use crate::password_policy::PasswordPolicyError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Authentication failed.
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The caller is authenticated but may not perform the action.
    #[error("Forbidden: cannot {action}: {reason}")]
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// Why the caller may not perform it.
        reason: String,
    },
    /// Token signing or credential storage failed.
    #[error("Authentication backend error: {message}")]
    Internal {
        /// A description of the failure.
        message: String,
    },
}

impl AuthError {
    pub(crate) fn authentication(reason: &str) -> Self {
        Self::AuthenticationFailed {
            reason: reason.to_string(),
        }
    }

    pub(crate) fn forbidden(action: &str, reason: &str) -> Self {
        Self::Unauthorized {
            action: action.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
/// Every variant maps to one stable error code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the caller may not perform the action.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// Why the caller may not perform it.
        reason: String,
    },
    /// A lifecycle rule was violated, such as acknowledging too early.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// The write conflicts with existing or concurrently changed data.
    Conflict {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
    /// Password policy violation.
    PasswordPolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
}

impl ApiError {
    /// Returns the stable error code carried in the response envelope.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed { .. } => "AUTHENTICATION_ERROR",
            Self::Unauthorized { .. } => "FORBIDDEN",
            Self::DomainRuleViolation { .. } | Self::Conflict { .. } => "CONFLICT",
            Self::InvalidInput { .. } | Self::PasswordPolicyViolation { .. } => {
                "VALIDATION_ERROR"
            }
            Self::ResourceNotFound { .. } => "NOT_FOUND",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Returns the offending field, if the error concerns one.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidInput { field, .. } => Some(field),
            Self::PasswordPolicyViolation { .. } => Some("password"),
            _ => None,
        }
    }

    pub(crate) fn not_found(resource_type: &str, message: String) -> Self {
        Self::ResourceNotFound {
            resource_type: resource_type.to_string(),
            message,
        }
    }

    pub(crate) fn invalid(field: &str, message: String) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            message,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized { action, reason } => {
                write!(f, "Forbidden: cannot {action}: {reason}")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::Conflict { message } => write!(f, "Conflict: {message}"),
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
            Self::PasswordPolicyViolation { message } => {
                write!(f, "Password policy violation: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized { action, reason } => Self::Unauthorized { action, reason },
            AuthError::Internal { message } => Self::Internal { message },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::InvalidAnswer { .. } | DomainError::DuplicateQuestion(_) => {
            ApiError::invalid("answers", message)
        }
        DomainError::InvalidSubmissionStatus(_) | DomainError::InvalidReviewStatus(_) => {
            ApiError::invalid("status", message)
        }
        DomainError::InvalidRole(_) => ApiError::invalid("role", message),
        DomainError::InvalidSettings(_) => ApiError::invalid("settings", message),
        DomainError::InvalidReason(_) => ApiError::invalid("reason", message),
        DomainError::InvalidComments { field, .. } => ApiError::invalid(field, message),
        DomainError::InvalidName(_) => ApiError::invalid("name", message),
        DomainError::InvalidEmail(_) => ApiError::invalid("email", message),
        DomainError::DateParseError { .. } => ApiError::invalid("due_date", message),
        DomainError::InvalidManager { .. } => ApiError::invalid("manager_id", message),
        DomainError::InvalidStatusTransition { .. } => ApiError::DomainRuleViolation {
            rule: String::from("review_lifecycle"),
            message,
        },
        DomainError::ReviewNotFound(_) => ApiError::not_found("Review", message),
        DomainError::EmployeeNotFound(_) => ApiError::not_found("Employee", message),
        DomainError::NoManagerAssigned(_) => ApiError::Unauthorized {
            action: String::from("submit_manager_review"),
            reason: message,
        },
        DomainError::InvalidClosure(_) => ApiError::Internal { message },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        other @ (CoreError::UnsupportedCommand(_) | CoreError::MissingIdentity(_)) => {
            ApiError::Internal {
                message: other.to_string(),
            }
        }
    }
}

/// Translates a persistence error into an API error.
///
/// Constraint and concurrency failures surface as conflicts; everything
/// else is internal.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::StaleVersion { review_id, .. } => ApiError::Conflict {
            message: format!("Review {review_id} was modified concurrently; reload and retry"),
        },
        PersistenceError::Duplicate(_) => ApiError::Conflict {
            message: String::from("A record with the same unique value already exists"),
        },
        PersistenceError::AlreadyBootstrapped => ApiError::Conflict {
            message: String::from("The system already has accounts"),
        },
        PersistenceError::ForeignKeyViolation(msg) => {
            ApiError::not_found("Referenced record", msg)
        }
        PersistenceError::NotFound(msg) => ApiError::not_found("Record", msg),
        PersistenceError::TokenAlreadyRevoked(_) => ApiError::AuthenticationFailed {
            reason: String::from("Refresh token is no longer valid"),
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
