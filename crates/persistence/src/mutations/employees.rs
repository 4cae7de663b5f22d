// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Employee directory mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use perfdesk_domain::Employee;
use time::OffsetDateTime;
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::format_timestamp;
use crate::diesel_schema::employees;
use crate::error::PersistenceError;

/// Inserts an employee.
///
/// The e-mail address is stored lower-cased so uniqueness is
/// case-insensitive.
///
/// # Errors
///
/// Returns `PersistenceError::Duplicate` if the e-mail is taken and
/// `PersistenceError::ForeignKeyViolation` if the manager does not exist.
pub fn create_employee(
    conn: &mut SqliteConnection,
    employee: &Employee,
    now: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let email: String = employee.email.trim().to_lowercase();

    diesel::insert_into(employees::table)
        .values((
            employees::name.eq(employee.name.trim()),
            employees::email.eq(&email),
            employees::department.eq(employee.department.as_deref()),
            employees::manager_id.eq(employee.manager_id),
            employees::created_at.eq(format_timestamp(now)?),
        ))
        .execute(conn)?;

    let employee_id: i64 = get_last_insert_rowid(conn)?;
    info!(employee_id, email = %email, "Employee created");

    Ok(employee_id)
}
