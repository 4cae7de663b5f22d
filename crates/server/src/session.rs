// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bearer token extraction at the server boundary.

use axum::{
    extract::{FromRequestParts, Query},
    http::{header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use perfdesk_api::{AuthenticationService, Principal};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{AppState, HttpError};

/// Extractor for the authenticated caller.
///
/// Reads `Authorization: Bearer <access token>`, verifies the JWT and
/// yields the `Principal` it carries. No database lookup is made; access
/// tokens are short-lived.
///
/// # Usage
///
/// ```ignore
/// async fn my_handler(
///     SessionPrincipal(principal): SessionPrincipal,
/// ) -> Result<Json<Envelope<T>>, HttpError> {
///     ...
/// }
/// ```
///
/// # Errors
///
/// Rejects with HTTP 401 and an `AUTHENTICATION_ERROR` envelope if the
/// header is missing or malformed, or the token is invalid or expired.
pub struct SessionPrincipal(pub Principal);

impl FromRequestParts<AppState> for SessionPrincipal {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token: &str = bearer_token(parts)?;
        verify(state, token).map(Self)
    }
}

/// Extractor for the caller of the live event stream.
///
/// Browsers cannot set headers on a WebSocket handshake, so besides the
/// `Authorization` header the access token may be passed as the
/// `access_token` query parameter. The header wins when both are present.
///
/// # Errors
///
/// Rejects with HTTP 401 before the upgrade if no valid token is given.
pub struct StreamPrincipal(pub Principal);

#[derive(Debug, Deserialize)]
struct StreamAuthQuery {
    access_token: Option<String>,
}

impl FromRequestParts<AppState> for StreamPrincipal {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts) {
            Ok(token) => verify(state, token).map(Self),
            Err(SessionError::MissingAuthorizationHeader) => {
                let Query(query) = Query::<StreamAuthQuery>::try_from_uri(&parts.uri)
                    .map_err(|_| SessionError::InvalidAuthorizationHeader)?;
                let token: String = query.access_token.ok_or_else(|| {
                    debug!("Live stream request without access token");
                    SessionError::MissingAuthorizationHeader
                })?;
                verify(state, &token).map(Self)
            }
            Err(e) => Err(e),
        }
    }
}

/// Reads the token from `Authorization: Bearer <token>`.
fn bearer_token(parts: &Parts) -> Result<&str, SessionError> {
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| {
            debug!("Missing Authorization header");
            SessionError::MissingAuthorizationHeader
        })?
        .to_str()
        .map_err(|_| {
            warn!("Invalid Authorization header encoding");
            SessionError::InvalidAuthorizationHeader
        })?;

    auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        warn!("Authorization header does not start with 'Bearer '");
        SessionError::InvalidAuthorizationHeader
    })
}

fn verify(state: &AppState, token: &str) -> Result<Principal, SessionError> {
    let principal: Principal = AuthenticationService::verify_access_token(&state.auth, token)
        .map_err(|e| {
            warn!(error = %e, "Access token rejected");
            SessionError::InvalidToken
        })?;

    debug!(
        account_id = principal.account_id,
        role = %principal.role,
        "Access token verified"
    );

    Ok(principal)
}

/// Bearer extraction errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// Authorization header is missing.
    MissingAuthorizationHeader,
    /// Authorization header format is invalid.
    InvalidAuthorizationHeader,
    /// The token failed verification or has expired.
    InvalidToken,
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let message: &str = match self {
            Self::MissingAuthorizationHeader => "Missing Authorization header",
            Self::InvalidAuthorizationHeader => {
                "Invalid Authorization header format. Expected: 'Bearer <token>'"
            }
            Self::InvalidToken => "Invalid or expired access token",
        };

        HttpError::authentication(message).into_response()
    }
}
