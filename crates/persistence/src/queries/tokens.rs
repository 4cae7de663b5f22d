// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Refresh token queries.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::{RefreshTokenData, parse_optional_timestamp, parse_timestamp};
use crate::diesel_schema::refresh_tokens;
use crate::error::PersistenceError;

/// Diesel Queryable struct for refresh token rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = refresh_tokens)]
struct RefreshTokenRow {
    token_id: i64,
    account_id: i64,
    token_hash: String,
    family: String,
    expires_at: String,
    created_at: String,
    revoked_at: Option<String>,
    replaced_by: Option<i64>,
}

impl TryFrom<RefreshTokenRow> for RefreshTokenData {
    type Error = PersistenceError;

    fn try_from(row: RefreshTokenRow) -> Result<Self, Self::Error> {
        Ok(Self {
            token_id: row.token_id,
            account_id: row.account_id,
            expires_at: parse_timestamp(&row.expires_at)?,
            created_at: parse_timestamp(&row.created_at)?,
            revoked_at: parse_optional_timestamp(row.revoked_at.as_deref())?,
            token_hash: row.token_hash,
            family: row.family,
            replaced_by: row.replaced_by,
        })
    }
}

/// Retrieves a refresh token by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the token is not found.
pub fn get_refresh_token(
    conn: &mut SqliteConnection,
    token_id: i64,
) -> Result<Option<RefreshTokenData>, PersistenceError> {
    refresh_tokens::table
        .filter(refresh_tokens::token_id.eq(token_id))
        .select(RefreshTokenRow::as_select())
        .first(conn)
        .optional()?
        .map(RefreshTokenData::try_from)
        .transpose()
}

/// Lists every token in a rotation family, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_token_family(
    conn: &mut SqliteConnection,
    family: &str,
) -> Result<Vec<RefreshTokenData>, PersistenceError> {
    refresh_tokens::table
        .filter(refresh_tokens::family.eq(family))
        .select(RefreshTokenRow::as_select())
        .order(refresh_tokens::token_id.asc())
        .load(conn)?
        .into_iter()
        .map(RefreshTokenData::try_from)
        .collect()
}
