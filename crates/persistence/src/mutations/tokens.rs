// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Refresh token mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::format_timestamp;
use crate::diesel_schema::refresh_tokens;
use crate::error::PersistenceError;

/// Stores a new refresh token.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_refresh_token(
    conn: &mut SqliteConnection,
    account_id: i64,
    token_hash: &str,
    family: &str,
    expires_at: OffsetDateTime,
    now: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(refresh_tokens::table)
        .values((
            refresh_tokens::account_id.eq(account_id),
            refresh_tokens::token_hash.eq(token_hash),
            refresh_tokens::family.eq(family),
            refresh_tokens::expires_at.eq(format_timestamp(expires_at)?),
            refresh_tokens::created_at.eq(format_timestamp(now)?),
        ))
        .execute(conn)?;

    let token_id: i64 = get_last_insert_rowid(conn)?;
    debug!(token_id, account_id, family, "Refresh token issued");
    Ok(token_id)
}

/// Revokes `token_id` and issues its successor in the same family.
///
/// The revoke is conditioned on the token still being live, so two
/// concurrent refreshes with the same token cannot both rotate it.
///
/// # Errors
///
/// Returns `PersistenceError::TokenAlreadyRevoked` if the token was revoked
/// before this call.
pub fn rotate_refresh_token(
    conn: &mut SqliteConnection,
    token_id: i64,
    account_id: i64,
    new_token_hash: &str,
    family: &str,
    expires_at: OffsetDateTime,
    now: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let revoked_at: String = format_timestamp(now)?;
        let rows: usize = diesel::update(refresh_tokens::table)
            .filter(refresh_tokens::token_id.eq(token_id))
            .filter(refresh_tokens::revoked_at.is_null())
            .set(refresh_tokens::revoked_at.eq(Some(&revoked_at)))
            .execute(conn)?;

        if rows == 0 {
            return Err(PersistenceError::TokenAlreadyRevoked(token_id));
        }

        let new_id: i64 =
            insert_refresh_token(conn, account_id, new_token_hash, family, expires_at, now)?;

        diesel::update(refresh_tokens::table)
            .filter(refresh_tokens::token_id.eq(token_id))
            .set(refresh_tokens::replaced_by.eq(Some(new_id)))
            .execute(conn)?;

        Ok(new_id)
    })
}

/// Revokes every live token in a family.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn revoke_token_family(
    conn: &mut SqliteConnection,
    family: &str,
    now: OffsetDateTime,
) -> Result<usize, PersistenceError> {
    let rows: usize = diesel::update(refresh_tokens::table)
        .filter(refresh_tokens::family.eq(family))
        .filter(refresh_tokens::revoked_at.is_null())
        .set(refresh_tokens::revoked_at.eq(Some(format_timestamp(now)?)))
        .execute(conn)?;

    if rows > 0 {
        info!(family, revoked = rows, "Refresh token family revoked");
    }
    Ok(rows)
}
