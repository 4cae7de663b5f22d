// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the ad-hoc review service.
//!
//! Handlers here are transport-agnostic: they take a persistence handle,
//! an authenticated `Principal` and typed requests, and return typed
//! responses or an `ApiError` with a stable error code.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod error;
mod handlers;
mod password_policy;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{
    AuthConfig, AuthenticationService, AuthorizationService, DEFAULT_ACCESS_TOKEN_TTL,
    DEFAULT_REFRESH_TOKEN_TTL, LOCKOUT_DURATION, MAX_FAILED_LOGIN_ATTEMPTS, Principal, TokenPair,
};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use handlers::{
    ApiResult, acknowledge_review, bootstrap, cancel_review, complete_review, create_account,
    create_employee, create_review, delete_review, get_employee, get_review, get_review_history,
    list_employees, list_reviews, login, logout, refresh, remind_review, set_account_status,
    submit_manager_review, submit_self_review, whoami,
};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    AccountInfo, AccountStatusResponse, AcknowledgeReviewRequest, AuditEventInfo, BootstrapRequest,
    CancelReviewRequest, CreateAccountRequest, CreateEmployeeRequest, CreateReviewRequest,
    DeleteReviewResponse, EmployeeInfo, ListReviewsQuery, LoginRequest, ManagerReviewResponse,
    RefreshRequest, ReviewInfo, SelfReviewResponse, SetAccountStatusRequest, SubmitReviewRequest,
    TokenResponse,
};
