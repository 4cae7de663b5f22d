// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use perfdesk_domain::Role;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{format_optional_timestamp, format_timestamp};
use crate::diesel_schema::accounts;
use crate::error::PersistenceError;
use crate::queries::accounts::count_accounts;

/// Creates a new account.
///
/// The e-mail is normalized to lower case for case-insensitive uniqueness
/// and the password is hashed with bcrypt.
///
/// # Errors
///
/// Returns an error if hashing fails, the e-mail already exists or the
/// linked employee does not exist.
pub fn create_account(
    conn: &mut SqliteConnection,
    email: &str,
    password: &str,
    role: Role,
    employee_id: Option<i64>,
    now: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let normalized: String = email.trim().to_lowercase();

    let password_hash: String = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    diesel::insert_into(accounts::table)
        .values((
            accounts::email.eq(&normalized),
            accounts::password_hash.eq(&password_hash),
            accounts::role.eq(role.as_str()),
            accounts::employee_id.eq(employee_id),
            accounts::created_at.eq(format_timestamp(now)?),
        ))
        .execute(conn)?;

    let account_id: i64 = get_last_insert_rowid(conn)?;
    info!(account_id, email = %normalized, role = %role, "Account created");

    Ok(account_id)
}

/// Creates the first administrator account.
///
/// The emptiness check and the insert share one transaction so two
/// concurrent bootstraps cannot both succeed.
///
/// # Errors
///
/// Returns `PersistenceError::AlreadyBootstrapped` if any account exists.
pub fn bootstrap_admin(
    conn: &mut SqliteConnection,
    email: &str,
    password: &str,
    now: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    conn.immediate_transaction(|conn| {
        if count_accounts(conn)? > 0 {
            return Err(PersistenceError::AlreadyBootstrapped);
        }
        create_account(conn, email, password, Role::Admin, None, now)
    })
}

/// Records a failed login attempt.
///
/// # Arguments
///
/// * `attempts` - The new consecutive failure count
/// * `locked_until` - Set when this failure triggers a lockout
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn record_failed_login(
    conn: &mut SqliteConnection,
    account_id: i64,
    attempts: i32,
    locked_until: Option<OffsetDateTime>,
) -> Result<(), PersistenceError> {
    if locked_until.is_some() {
        warn!(account_id, attempts, "Account locked after failed logins");
    } else {
        debug!(account_id, attempts, "Recording failed login");
    }

    diesel::update(accounts::table)
        .filter(accounts::account_id.eq(account_id))
        .set((
            accounts::failed_login_attempts.eq(attempts),
            accounts::locked_until.eq(format_optional_timestamp(locked_until)?),
        ))
        .execute(conn)?;

    Ok(())
}

/// Records a successful login, clearing the failure counter and any lock.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn record_successful_login(
    conn: &mut SqliteConnection,
    account_id: i64,
    now: OffsetDateTime,
) -> Result<(), PersistenceError> {
    debug!(account_id, "Recording successful login");

    diesel::update(accounts::table)
        .filter(accounts::account_id.eq(account_id))
        .set((
            accounts::failed_login_attempts.eq(0),
            accounts::locked_until.eq(None::<String>),
            accounts::last_login_at.eq(Some(format_timestamp(now)?)),
        ))
        .execute(conn)?;

    Ok(())
}

/// Enables or disables an account.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the account does not exist.
pub fn set_account_disabled(
    conn: &mut SqliteConnection,
    account_id: i64,
    disabled: bool,
) -> Result<(), PersistenceError> {
    info!(account_id, disabled, "Changing account disabled flag");

    let rows: usize = diesel::update(accounts::table)
        .filter(accounts::account_id.eq(account_id))
        .set(accounts::is_disabled.eq(i32::from(disabled)))
        .execute(conn)?;

    if rows == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Account {account_id} not found"
        )));
    }
    Ok(())
}
