// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Password policy validation for account credentials.

use thiserror::Error;

/// Password policy errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    /// Password is too short.
    #[error("Password must be at least {min_length} characters long")]
    TooShort { min_length: usize },

    /// Password does not meet complexity requirements.
    #[error(
        "Password must contain at least {required} of the following: uppercase letter, lowercase letter, digit, symbol (found {found})"
    )]
    InsufficientComplexity { required: usize, found: usize },

    /// Password is the account's e-mail address or its local part.
    #[error("Password must not match the account e-mail address")]
    MatchesEmail,
}

/// Password policy configuration.
#[derive(Debug, Clone, Copy)]
pub struct PasswordPolicy {
    /// Minimum password length, in characters.
    pub min_length: usize,
    /// Minimum number of character classes required (out of 4).
    pub min_complexity: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 12,
            min_complexity: 3,
        }
    }
}

impl PasswordPolicy {
    /// Validates a password for the account identified by `email`.
    ///
    /// # Errors
    ///
    /// Returns a `PasswordPolicyError` if the password does not meet policy requirements.
    pub fn validate(&self, password: &str, email: &str) -> Result<(), PasswordPolicyError> {
        if password.chars().count() < self.min_length {
            return Err(PasswordPolicyError::TooShort {
                min_length: self.min_length,
            });
        }

        let found: usize = character_classes(password);
        if found < self.min_complexity {
            return Err(PasswordPolicyError::InsufficientComplexity {
                required: self.min_complexity,
                found,
            });
        }

        let password_lower: String = password.to_lowercase();
        let email_lower: String = email.trim().to_lowercase();
        let local_part: &str = email_lower.split('@').next().unwrap_or_default();
        if password_lower == email_lower || password_lower == local_part {
            return Err(PasswordPolicyError::MatchesEmail);
        }

        Ok(())
    }
}

/// Counts the character classes present: uppercase, lowercase, digit and
/// symbol. Non-ASCII letters count as symbols.
fn character_classes(password: &str) -> usize {
    let classes: [bool; 4] = [
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password
            .chars()
            .any(|c| !c.is_ascii_alphanumeric() && !c.is_whitespace()),
    ];
    classes.into_iter().filter(|present| *present).count()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const EMAIL: &str = "pat.doe@example.com";

    #[test]
    fn test_valid_passwords() {
        let policy = PasswordPolicy::default();

        assert!(policy.validate("Quarterly-Review-9", EMAIL).is_ok());
        assert!(policy.validate("QuarterlyReview9", EMAIL).is_ok());
        assert!(policy.validate("quarterly-review-9", EMAIL).is_ok());
        assert!(policy.validate("Review!2026a", EMAIL).is_ok());
    }

    #[test]
    fn test_too_short() {
        let policy = PasswordPolicy::default();
        assert_eq!(
            policy.validate("Sh0rt!", EMAIL),
            Err(PasswordPolicyError::TooShort { min_length: 12 })
        );
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let policy = PasswordPolicy::default();
        assert_eq!(
            policy.validate("Ünïcödé1ab", EMAIL),
            Err(PasswordPolicyError::TooShort { min_length: 12 })
        );
    }

    #[test]
    fn test_insufficient_complexity() {
        let policy = PasswordPolicy::default();

        assert_eq!(
            policy.validate("onlylowercaseletters", EMAIL),
            Err(PasswordPolicyError::InsufficientComplexity {
                required: 3,
                found: 1
            })
        );
        assert_eq!(
            policy.validate("MixedCaseLetters", EMAIL),
            Err(PasswordPolicyError::InsufficientComplexity {
                required: 3,
                found: 2
            })
        );
    }

    #[test]
    fn test_password_matching_email_is_rejected() {
        let policy = PasswordPolicy::default();

        assert_eq!(
            policy.validate("Pat.Doe@Example.com", EMAIL),
            Err(PasswordPolicyError::MatchesEmail)
        );
        assert_eq!(
            policy.validate("PAT.doe1234!", "pat.doe1234!@example.com"),
            Err(PasswordPolicyError::MatchesEmail)
        );
    }

    #[test]
    fn test_character_classes() {
        assert_eq!(character_classes("Aa1!"), 4);
        assert_eq!(character_classes("Aa1"), 3);
        assert_eq!(character_classes("abc!"), 2);
        assert_eq!(character_classes("abc def"), 1);
        assert_eq!(character_classes(""), 0);
    }
}
