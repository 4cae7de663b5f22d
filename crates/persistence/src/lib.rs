// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the ad-hoc review service.
//!
//! This crate stores employees, accounts, refresh tokens, reviews and their
//! audit trail in `SQLite` through Diesel.
//!
//! ## Storage model
//!
//! - Reviews keep their submission tracks and settings as JSON columns.
//! - Only the closure marker is authoritative; the `status` column is the
//!   derived status written alongside it for filtering.
//! - Every review write carries the version it was computed from. A write
//!   against a newer row fails with `PersistenceError::StaleVersion`.
//! - Audit events are not tied to the review row by a foreign key, so a
//!   deleted review keeps its history.
//!
//! ## Testing
//!
//! `Persistence::new_in_memory()` gives each caller its own named shared
//! in-memory database, so tests never see each other's rows.

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

use diesel::SqliteConnection;
use perfdesk::TransitionResult;
use perfdesk_audit::AuditEvent;
use perfdesk_domain::{AdhocReview, Employee, ReviewStatus, Role};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{AccountData, RefreshTokenData};
pub use error::PersistenceError;

/// Type alias kept for callers that name the backend explicitly.
pub type SqlitePersistence = Persistence;

/// Persistence adapter over a single `SQLite` connection.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an isolated in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let url: String = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter backed by a database file.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError(String::from("Invalid database path"))
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Employees
    // ========================================================================

    /// Creates an employee and returns its id.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Duplicate` if the e-mail is taken, or
    /// `PersistenceError::ForeignKeyViolation` if the manager does not exist.
    pub fn create_employee(
        &mut self,
        employee: &Employee,
        now: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        mutations::employees::create_employee(&mut self.conn, employee, now)
    }

    /// Retrieves an employee by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_employee(&mut self, employee_id: i64) -> Result<Option<Employee>, PersistenceError> {
        queries::employees::get_employee(&mut self.conn, employee_id)
    }

    /// Lists all employees ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_employees(&mut self) -> Result<Vec<Employee>, PersistenceError> {
        queries::employees::list_employees(&mut self.conn)
    }

    // ========================================================================
    // Accounts
    // ========================================================================

    /// Creates an account with a bcrypt-hashed password.
    ///
    /// # Errors
    ///
    /// Returns an error if the e-mail is taken or the employee does not exist.
    pub fn create_account(
        &mut self,
        email: &str,
        password: &str,
        role: Role,
        employee_id: Option<i64>,
        now: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        mutations::accounts::create_account(&mut self.conn, email, password, role, employee_id, now)
    }

    /// Creates the first administrator if no account exists yet.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::AlreadyBootstrapped` if any account exists.
    pub fn bootstrap_admin(
        &mut self,
        email: &str,
        password: &str,
        now: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        mutations::accounts::bootstrap_admin(&mut self.conn, email, password, now)
    }

    /// Retrieves an account by e-mail, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_account_by_email(
        &mut self,
        email: &str,
    ) -> Result<Option<AccountData>, PersistenceError> {
        queries::accounts::get_account_by_email(&mut self.conn, email)
    }

    /// Retrieves an account by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_account_by_id(
        &mut self,
        account_id: i64,
    ) -> Result<Option<AccountData>, PersistenceError> {
        queries::accounts::get_account_by_id(&mut self.conn, account_id)
    }

    /// Counts all accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_accounts(&mut self) -> Result<i64, PersistenceError> {
        queries::accounts::count_accounts(&mut self.conn)
    }

    /// Verifies a password against a stored bcrypt hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the hash is malformed.
    pub fn verify_password(
        &self,
        password: &str,
        password_hash: &str,
    ) -> Result<bool, PersistenceError> {
        bcrypt::verify(password, password_hash)
            .map_err(|e| PersistenceError::Other(format!("Password verification failed: {e}")))
    }

    /// Records a failed login and an optional lock.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn record_failed_login(
        &mut self,
        account_id: i64,
        attempts: i32,
        locked_until: Option<OffsetDateTime>,
    ) -> Result<(), PersistenceError> {
        mutations::accounts::record_failed_login(&mut self.conn, account_id, attempts, locked_until)
    }

    /// Records a successful login.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn record_successful_login(
        &mut self,
        account_id: i64,
        now: OffsetDateTime,
    ) -> Result<(), PersistenceError> {
        mutations::accounts::record_successful_login(&mut self.conn, account_id, now)
    }

    /// Enables or disables an account.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the account does not exist.
    pub fn set_account_disabled(
        &mut self,
        account_id: i64,
        disabled: bool,
    ) -> Result<(), PersistenceError> {
        mutations::accounts::set_account_disabled(&mut self.conn, account_id, disabled)
    }

    // ========================================================================
    // Refresh tokens
    // ========================================================================

    /// Stores a new refresh token hash and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_refresh_token(
        &mut self,
        account_id: i64,
        token_hash: &str,
        family: &str,
        expires_at: OffsetDateTime,
        now: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        mutations::tokens::insert_refresh_token(
            &mut self.conn,
            account_id,
            token_hash,
            family,
            expires_at,
            now,
        )
    }

    /// Retrieves a refresh token by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_refresh_token(
        &mut self,
        token_id: i64,
    ) -> Result<Option<RefreshTokenData>, PersistenceError> {
        queries::tokens::get_refresh_token(&mut self.conn, token_id)
    }

    /// Lists every token of a rotation family, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_token_family(
        &mut self,
        family: &str,
    ) -> Result<Vec<RefreshTokenData>, PersistenceError> {
        queries::tokens::list_token_family(&mut self.conn, family)
    }

    /// Revokes a live token and issues its successor.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::TokenAlreadyRevoked` if the token was
    /// already revoked.
    pub fn rotate_refresh_token(
        &mut self,
        token_id: i64,
        account_id: i64,
        new_token_hash: &str,
        family: &str,
        expires_at: OffsetDateTime,
        now: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        mutations::tokens::rotate_refresh_token(
            &mut self.conn,
            token_id,
            account_id,
            new_token_hash,
            family,
            expires_at,
            now,
        )
    }

    /// Revokes every live token of a family.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn revoke_token_family(
        &mut self,
        family: &str,
        now: OffsetDateTime,
    ) -> Result<usize, PersistenceError> {
        mutations::tokens::revoke_token_family(&mut self.conn, family, now)
    }

    // ========================================================================
    // Reviews
    // ========================================================================

    /// Persists a `CreateReview` transition.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced row is missing or the insert fails.
    pub fn create_review(
        &mut self,
        result: &TransitionResult,
    ) -> Result<AdhocReview, PersistenceError> {
        mutations::reviews::create_review(&mut self.conn, result)
    }

    /// Persists a lifecycle transition computed from a review at
    /// `expected_version`.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::StaleVersion` if the stored row moved on.
    pub fn update_review(
        &mut self,
        expected_version: i64,
        result: &TransitionResult,
    ) -> Result<AdhocReview, PersistenceError> {
        mutations::reviews::update_review(&mut self.conn, expected_version, result)
    }

    /// Persists a `DeleteReview` transition.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::StaleVersion` if the stored row moved on.
    pub fn delete_review(
        &mut self,
        expected_version: i64,
        result: &TransitionResult,
    ) -> Result<(), PersistenceError> {
        mutations::reviews::delete_review(&mut self.conn, expected_version, result)
    }

    /// Retrieves a review by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is corrupt.
    pub fn get_review(&mut self, review_id: i64) -> Result<Option<AdhocReview>, PersistenceError> {
        queries::reviews::get_review(&mut self.conn, review_id)
    }

    /// Lists reviews newest first, optionally filtered.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is corrupt.
    pub fn list_reviews(
        &mut self,
        status: Option<ReviewStatus>,
        employee_id: Option<i64>,
    ) -> Result<Vec<AdhocReview>, PersistenceError> {
        queries::reviews::list_reviews(&mut self.conn, status, employee_id)
    }

    // ========================================================================
    // Audit
    // ========================================================================

    /// Retrieves the audit trail of a review, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_review_history(
        &mut self,
        review_id: i64,
    ) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::audit::get_review_history(&mut self.conn, review_id)
    }

    /// Counts all audit events.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_audit_events(&mut self) -> Result<i64, PersistenceError> {
        queries::audit::count_audit_events(&mut self.conn)
    }
}
