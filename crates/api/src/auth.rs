// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.
//!
//! Access tokens are short-lived HS256 JWTs carrying the caller's
//! `Principal`. Refresh tokens are opaque `"<id>.<secret>"` strings; only a
//! bcrypt hash of the secret is stored, and every use rotates the token
//! within its family.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use perfdesk::is_review_visible;
use perfdesk_audit::Actor;
use perfdesk_domain::{AdhocReview, Role};
use perfdesk_persistence::{AccountData, PersistenceError, RefreshTokenData, SqlitePersistence};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::error::AuthError;

/// Consecutive failed logins that lock an account.
pub const MAX_FAILED_LOGIN_ATTEMPTS: i32 = 5;

/// How long a locked account stays locked.
pub const LOCKOUT_DURATION: Duration = Duration::minutes(15);

/// Default access token lifetime.
pub const DEFAULT_ACCESS_TOKEN_TTL: Duration = Duration::minutes(15);

/// Default refresh token lifetime.
pub const DEFAULT_REFRESH_TOKEN_TTL: Duration = Duration::days(14);

/// bcrypt work factor for refresh token secrets. The secrets are 256-bit
/// random values rather than user-chosen passwords.
const REFRESH_TOKEN_HASH_COST: u32 = 4;

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const INVALID_REFRESH_TOKEN: &str = "Invalid refresh token";

/// Checked against when the e-mail is unknown, so that case costs the same
/// bcrypt work as a wrong password.
static UNKNOWN_ACCOUNT_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| bcrypt::hash("perfdesk-unknown-account", bcrypt::DEFAULT_COST).ok());

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// The account the caller logged in with.
    pub account_id: i64,
    /// The account e-mail address.
    pub email: String,
    /// The account role.
    pub role: Role,
    /// The employee record linked to the account, if any.
    pub employee_id: Option<i64>,
}

impl Principal {
    /// Builds the principal for a stored account.
    #[must_use]
    pub fn from_account(account: &AccountData) -> Self {
        Self {
            account_id: account.account_id,
            email: account.email.clone(),
            role: account.role,
            employee_id: account.employee_id,
        }
    }

    /// Converts this principal into an audit actor.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::account(self.account_id)
    }

    const fn is_review_administrator(&self) -> bool {
        self.role.is_review_administrator()
    }
}

/// Signing and lifetime settings for issued tokens.
#[derive(Clone)]
pub struct AuthConfig {
    jwt_secret: Vec<u8>,
    /// Lifetime of access tokens.
    pub access_token_ttl: Duration,
    /// Lifetime of refresh tokens.
    pub refresh_token_ttl: Duration,
}

impl AuthConfig {
    /// Creates a configuration with the default token lifetimes.
    #[must_use]
    pub fn new(jwt_secret: &str) -> Self {
        Self {
            jwt_secret: jwt_secret.as_bytes().to_vec(),
            access_token_ttl: DEFAULT_ACCESS_TOKEN_TTL,
            refresh_token_ttl: DEFAULT_REFRESH_TOKEN_TTL,
        }
    }

    /// Overrides the token lifetimes.
    #[must_use]
    pub const fn with_ttls(
        mut self,
        access_token_ttl: Duration,
        refresh_token_ttl: Duration,
    ) -> Self {
        self.access_token_ttl = access_token_ttl;
        self.refresh_token_ttl = refresh_token_ttl;
        self
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .finish()
    }
}

/// JWT claims of an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct AccessClaims {
    sub: String,
    email: String,
    role: Role,
    #[serde(
        rename = "employeeId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    employee_id: Option<i64>,
    iat: i64,
    exp: i64,
}

/// A freshly issued access/refresh token pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    /// The signed access token.
    pub access_token: String,
    /// The opaque refresh token.
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// Authorization service for enforcing access control on review operations.
///
/// Role decides who may administer and initiate reviews; identity decides
/// who may fill in a review track.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Admin, HR and managers may trigger reviews.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller's role may not initiate reviews.
    pub fn authorize_create_review(principal: &Principal) -> Result<(), AuthError> {
        if principal.role.can_initiate_reviews() {
            Ok(())
        } else {
            Err(AuthError::forbidden(
                "create review",
                "requires the admin, hr or manager role",
            ))
        }
    }

    /// The caller must be able to see the review.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not involved and not an administrator.
    pub fn authorize_view_review(
        principal: &Principal,
        review: &AdhocReview,
    ) -> Result<(), AuthError> {
        if is_review_visible(
            review,
            principal.role,
            principal.account_id,
            principal.employee_id,
        ) {
            Ok(())
        } else {
            Err(AuthError::forbidden(
                "view review",
                "the caller is not involved in this review",
            ))
        }
    }

    /// Only the subject employee may submit the self review.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not the review's subject.
    pub fn authorize_submit_self_review(
        principal: &Principal,
        review: &AdhocReview,
    ) -> Result<(), AuthError> {
        if principal.employee_id == Some(review.employee_id) {
            Ok(())
        } else {
            Err(AuthError::forbidden(
                "submit self review",
                "only the employee under review may submit it",
            ))
        }
    }

    /// Only the assigned manager may submit the manager review.
    ///
    /// # Errors
    ///
    /// Returns an error if the review has no manager or the caller is not it.
    pub fn authorize_submit_manager_review(
        principal: &Principal,
        review: &AdhocReview,
    ) -> Result<(), AuthError> {
        match (principal.employee_id, review.manager_id) {
            (Some(caller), Some(manager)) if caller == manager => Ok(()),
            (_, None) => Err(AuthError::forbidden(
                "submit manager review",
                "the review has no assigned manager",
            )),
            _ => Err(AuthError::forbidden(
                "submit manager review",
                "only the assigned manager may submit it",
            )),
        }
    }

    /// The subject employee, admin or HR may acknowledge.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is neither the subject nor an administrator.
    pub fn authorize_acknowledge(
        principal: &Principal,
        review: &AdhocReview,
    ) -> Result<(), AuthError> {
        if principal.is_review_administrator() || principal.employee_id == Some(review.employee_id)
        {
            Ok(())
        } else {
            Err(AuthError::forbidden(
                "acknowledge review",
                "only the employee under review, admin or hr may acknowledge it",
            ))
        }
    }

    /// Only admin and HR may complete.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an administrator.
    pub fn authorize_complete(principal: &Principal) -> Result<(), AuthError> {
        Self::require_administrator(principal, "complete review")
    }

    /// Admin, HR or the account that triggered the review may cancel it.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is neither the initiator nor an administrator.
    pub fn authorize_cancel(principal: &Principal, review: &AdhocReview) -> Result<(), AuthError> {
        Self::require_administrator_or_initiator(principal, review, "cancel review")
    }

    /// Admin, HR or the account that triggered the review may send reminders.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is neither the initiator nor an administrator.
    pub fn authorize_remind(principal: &Principal, review: &AdhocReview) -> Result<(), AuthError> {
        Self::require_administrator_or_initiator(principal, review, "send reminder")
    }

    /// Only admin and HR may delete.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an administrator.
    pub fn authorize_delete(principal: &Principal) -> Result<(), AuthError> {
        Self::require_administrator(principal, "delete review")
    }

    /// Only admin and HR may maintain the employee directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an administrator.
    pub fn authorize_manage_employees(principal: &Principal) -> Result<(), AuthError> {
        Self::require_administrator(principal, "manage employees")
    }

    /// Only admins may create accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin.
    pub fn authorize_create_account(principal: &Principal) -> Result<(), AuthError> {
        Self::require_admin(principal, "create account")
    }

    /// Only admins may enable or disable accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin.
    pub fn authorize_set_account_status(principal: &Principal) -> Result<(), AuthError> {
        Self::require_admin(principal, "change account status")
    }

    fn require_admin(principal: &Principal, action: &str) -> Result<(), AuthError> {
        match principal.role {
            Role::Admin => Ok(()),
            Role::Hr | Role::Manager | Role::Employee => {
                Err(AuthError::forbidden(action, "requires the admin role"))
            }
        }
    }

    fn require_administrator(principal: &Principal, action: &str) -> Result<(), AuthError> {
        if principal.is_review_administrator() {
            Ok(())
        } else {
            Err(AuthError::forbidden(action, "requires the admin or hr role"))
        }
    }

    fn require_administrator_or_initiator(
        principal: &Principal,
        review: &AdhocReview,
        action: &str,
    ) -> Result<(), AuthError> {
        if principal.is_review_administrator() || review.triggered_by == principal.account_id {
            Ok(())
        } else {
            Err(AuthError::forbidden(
                action,
                "only the account that triggered the review, admin or hr may do this",
            ))
        }
    }
}

/// Authentication service for login, token issue and token rotation.
pub struct AuthenticationService;

impl AuthenticationService {
    pub(crate) fn unknown_account_hash() -> Option<&'static str> {
        UNKNOWN_ACCOUNT_HASH.as_deref()
    }

    /// Authenticates an account by e-mail and password.
    ///
    /// Wrong passwords count towards a lockout. A locked or disabled
    /// account is rejected even with the right password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AuthenticationFailed` for unknown accounts, wrong
    /// passwords, locked or disabled accounts.
    pub fn login(
        persistence: &mut SqlitePersistence,
        config: &AuthConfig,
        email: &str,
        password: &str,
        now: OffsetDateTime,
    ) -> Result<(TokenPair, Principal), AuthError> {
        let Some(account) = persistence
            .get_account_by_email(email)
            .map_err(Self::map_persistence_error)?
        else {
            warn!("Login attempt for unknown account");
            if let Some(hash) = Self::unknown_account_hash() {
                let _ = persistence.verify_password(password, hash);
            }
            return Err(AuthError::authentication(INVALID_CREDENTIALS));
        };

        if account.is_disabled {
            warn!(
                account_id = account.account_id,
                "Login attempt for disabled account"
            );
            return Err(AuthError::authentication("Account is disabled"));
        }

        if account.is_locked_at(now) {
            warn!(
                account_id = account.account_id,
                "Login attempt for locked account"
            );
            return Err(AuthError::authentication(
                "Account is temporarily locked after repeated failed logins",
            ));
        }

        let password_valid: bool = persistence
            .verify_password(password, &account.password_hash)
            .map_err(Self::map_persistence_error)?;

        if !password_valid {
            Self::record_failure(persistence, &account, now)?;
            return Err(AuthError::authentication(INVALID_CREDENTIALS));
        }

        persistence
            .record_successful_login(account.account_id, now)
            .map_err(Self::map_persistence_error)?;

        let principal: Principal = Principal::from_account(&account);
        let family: String = random_hex::<16>();
        let pair: TokenPair = Self::issue_pair(persistence, config, &principal, &family, now)?;

        info!(account_id = account.account_id, role = %account.role, "Login succeeded");
        Ok((pair, principal))
    }

    /// Exchanges a refresh token for a new token pair.
    ///
    /// The presented token is revoked and replaced. Presenting a token that
    /// was already revoked revokes its whole family.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AuthenticationFailed` if the token is malformed,
    /// unknown, expired, reused, or its account is gone or disabled.
    pub fn refresh(
        persistence: &mut SqlitePersistence,
        config: &AuthConfig,
        presented: &str,
        now: OffsetDateTime,
    ) -> Result<(TokenPair, Principal), AuthError> {
        let token: RefreshTokenData = Self::lookup_refresh_token(persistence, presented)?;

        if token.is_revoked() {
            Self::revoke_reused_family(persistence, &token, now)?;
            return Err(AuthError::authentication("Refresh token has already been used"));
        }
        if token.is_expired_at(now) {
            return Err(AuthError::authentication("Refresh token has expired"));
        }
        debug!(token_id = token.token_id, "Refresh token accepted");

        let account: AccountData = persistence
            .get_account_by_id(token.account_id)
            .map_err(Self::map_persistence_error)?
            .filter(|account| !account.is_disabled)
            .ok_or_else(|| AuthError::authentication("Account is no longer active"))?;
        let principal: Principal = Principal::from_account(&account);

        let new_secret: String = random_hex::<32>();
        let new_hash: String = hash_secret(&new_secret)?;
        let new_id: i64 = match persistence.rotate_refresh_token(
            token.token_id,
            account.account_id,
            &new_hash,
            &token.family,
            now + config.refresh_token_ttl,
            now,
        ) {
            Ok(id) => id,
            Err(PersistenceError::TokenAlreadyRevoked(_)) => {
                Self::revoke_reused_family(persistence, &token, now)?;
                return Err(AuthError::authentication("Refresh token has already been used"));
            }
            Err(e) => return Err(Self::map_persistence_error(e)),
        };

        let pair: TokenPair = TokenPair {
            access_token: Self::issue_access_token(config, &principal, now)?,
            refresh_token: format!("{new_id}.{new_secret}"),
            expires_in: config.access_token_ttl.whole_seconds(),
        };
        info!(
            account_id = account.account_id,
            token_id = new_id,
            "Refresh token rotated"
        );
        Ok((pair, principal))
    }

    /// Revokes the family of the presented refresh token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AuthenticationFailed` if the token is malformed or unknown.
    pub fn logout(
        persistence: &mut SqlitePersistence,
        presented: &str,
        now: OffsetDateTime,
    ) -> Result<(), AuthError> {
        let token: RefreshTokenData = Self::lookup_refresh_token(persistence, presented)?;
        persistence
            .revoke_token_family(&token.family, now)
            .map_err(Self::map_persistence_error)?;
        info!(account_id = token.account_id, "Logged out");
        Ok(())
    }

    /// Signs an access token for the principal.
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails.
    pub fn issue_access_token(
        config: &AuthConfig,
        principal: &Principal,
        now: OffsetDateTime,
    ) -> Result<String, AuthError> {
        let claims: AccessClaims = AccessClaims {
            sub: principal.account_id.to_string(),
            email: principal.email.clone(),
            role: principal.role,
            employee_id: principal.employee_id,
            iat: now.unix_timestamp(),
            exp: (now + config.access_token_ttl).unix_timestamp(),
        };

        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&config.jwt_secret),
        )
        .map_err(|e| AuthError::Internal {
            message: format!("Failed to sign access token: {e}"),
        })
    }

    /// Verifies an access token and returns the principal it carries.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AuthenticationFailed` if the signature, algorithm
    /// or expiry check fails.
    pub fn verify_access_token(config: &AuthConfig, token: &str) -> Result<Principal, AuthError> {
        let mut validation: Validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = jsonwebtoken::decode::<AccessClaims>(
            token,
            &DecodingKey::from_secret(&config.jwt_secret),
            &validation,
        )
        .map_err(|e| {
            debug!(error = %e, "Access token rejected");
            AuthError::authentication("Invalid or expired access token")
        })?;

        let account_id: i64 = data
            .claims
            .sub
            .parse()
            .map_err(|_| AuthError::authentication("Invalid access token subject"))?;

        Ok(Principal {
            account_id,
            email: data.claims.email,
            role: data.claims.role,
            employee_id: data.claims.employee_id,
        })
    }

    fn issue_pair(
        persistence: &mut SqlitePersistence,
        config: &AuthConfig,
        principal: &Principal,
        family: &str,
        now: OffsetDateTime,
    ) -> Result<TokenPair, AuthError> {
        let secret: String = random_hex::<32>();
        let token_id: i64 = persistence
            .insert_refresh_token(
                principal.account_id,
                &hash_secret(&secret)?,
                family,
                now + config.refresh_token_ttl,
                now,
            )
            .map_err(Self::map_persistence_error)?;

        Ok(TokenPair {
            access_token: Self::issue_access_token(config, principal, now)?,
            refresh_token: format!("{token_id}.{secret}"),
            expires_in: config.access_token_ttl.whole_seconds(),
        })
    }

    fn record_failure(
        persistence: &mut SqlitePersistence,
        account: &AccountData,
        now: OffsetDateTime,
    ) -> Result<(), AuthError> {
        // A lock that has run out starts a fresh count.
        let previous: i32 = if account.locked_until.is_some() {
            0
        } else {
            account.failed_login_attempts
        };
        let attempts: i32 = previous + 1;
        let locked_until: Option<OffsetDateTime> =
            (attempts >= MAX_FAILED_LOGIN_ATTEMPTS).then(|| now + LOCKOUT_DURATION);

        warn!(
            account_id = account.account_id,
            attempts,
            "Login failed: wrong password"
        );
        persistence
            .record_failed_login(account.account_id, attempts, locked_until)
            .map_err(Self::map_persistence_error)
    }

    fn lookup_refresh_token(
        persistence: &mut SqlitePersistence,
        presented: &str,
    ) -> Result<RefreshTokenData, AuthError> {
        let (id, secret) = presented
            .split_once('.')
            .ok_or_else(|| AuthError::authentication(INVALID_REFRESH_TOKEN))?;
        let token_id: i64 = id
            .parse()
            .map_err(|_| AuthError::authentication(INVALID_REFRESH_TOKEN))?;

        let token: RefreshTokenData = persistence
            .get_refresh_token(token_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::authentication(INVALID_REFRESH_TOKEN))?;

        let matches: bool = bcrypt::verify(secret, &token.token_hash).unwrap_or(false);
        if !matches {
            warn!(token_id, "Refresh token secret mismatch");
            return Err(AuthError::authentication(INVALID_REFRESH_TOKEN));
        }

        Ok(token)
    }

    fn revoke_reused_family(
        persistence: &mut SqlitePersistence,
        token: &RefreshTokenData,
        now: OffsetDateTime,
    ) -> Result<(), AuthError> {
        warn!(
            token_id = token.token_id,
            account_id = token.account_id,
            "Refresh token reuse detected; revoking family"
        );
        persistence
            .revoke_token_family(&token.family, now)
            .map_err(Self::map_persistence_error)?;
        Ok(())
    }

    fn map_persistence_error(err: PersistenceError) -> AuthError {
        AuthError::Internal {
            message: format!("Database error: {err}"),
        }
    }
}

fn hash_secret(secret: &str) -> Result<String, AuthError> {
    bcrypt::hash(secret, REFRESH_TOKEN_HASH_COST).map_err(|e| AuthError::Internal {
        message: format!("Failed to hash token: {e}"),
    })
}

/// Returns `N` random bytes from the thread RNG, hex-encoded.
fn random_hex<const N: usize>() -> String {
    let bytes: [u8; N] = rand::random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
