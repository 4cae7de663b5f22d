// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::data_models::{AccountData, parse_optional_timestamp, parse_role, parse_timestamp};
use crate::diesel_schema::accounts;
use crate::error::PersistenceError;

/// Diesel Queryable struct for account rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = accounts)]
struct AccountRow {
    account_id: i64,
    email: String,
    password_hash: String,
    role: String,
    employee_id: Option<i64>,
    failed_login_attempts: i32,
    locked_until: Option<String>,
    is_disabled: i32,
    created_at: String,
    last_login_at: Option<String>,
}

impl TryFrom<AccountRow> for AccountData {
    type Error = PersistenceError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Self {
            account_id: row.account_id,
            role: parse_role(&row.role)?,
            locked_until: parse_optional_timestamp(row.locked_until.as_deref())?,
            created_at: parse_timestamp(&row.created_at)?,
            last_login_at: parse_optional_timestamp(row.last_login_at.as_deref())?,
            email: row.email,
            password_hash: row.password_hash,
            employee_id: row.employee_id,
            failed_login_attempts: row.failed_login_attempts,
            is_disabled: row.is_disabled != 0,
        })
    }
}

/// Retrieves an account by e-mail address.
///
/// The lookup is case-insensitive.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the account is not found.
pub fn get_account_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<AccountData>, PersistenceError> {
    let normalized: String = email.trim().to_lowercase();
    debug!(email = %normalized, "Looking up account by email");

    accounts::table
        .filter(accounts::email.eq(&normalized))
        .select(AccountRow::as_select())
        .first(conn)
        .optional()?
        .map(AccountData::try_from)
        .transpose()
}

/// Retrieves an account by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the account is not found.
pub fn get_account_by_id(
    conn: &mut SqliteConnection,
    account_id: i64,
) -> Result<Option<AccountData>, PersistenceError> {
    debug!(account_id, "Looking up account by ID");

    accounts::table
        .filter(accounts::account_id.eq(account_id))
        .select(AccountRow::as_select())
        .first(conn)
        .optional()?
        .map(AccountData::try_from)
        .transpose()
}

/// Counts all accounts.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_accounts(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(accounts::table.count().get_result(conn)?)
}
