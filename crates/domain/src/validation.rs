// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::submission::{Answer, AnswerValue};
use crate::types::{Employee, ReviewSettings};
use std::collections::HashSet;
use time::Date;
use time::macros::format_description;

/// Maximum length of a review reason.
pub const MAX_REASON_LENGTH: usize = 2000;

/// Maximum length of acknowledgment comments.
pub const MAX_COMMENTS_LENGTH: usize = 5000;

/// Maximum length of a single free-text answer.
pub const MAX_TEXT_ANSWER_LENGTH: usize = 10_000;

/// Maximum number of answers in one submission.
pub const MAX_ANSWERS: usize = 200;

/// Validates a submission's answer set.
///
/// Answers are kept in the order given. Each question may be answered once.
///
/// # Errors
///
/// Returns an error if:
/// - There are more than `MAX_ANSWERS` answers
/// - A question id is empty or repeated
/// - A numeric answer is not finite
/// - A text answer exceeds `MAX_TEXT_ANSWER_LENGTH`
/// - A choice answer contains an empty option
pub fn validate_answers(answers: &[Answer]) -> Result<(), DomainError> {
    if answers.len() > MAX_ANSWERS {
        return Err(DomainError::InvalidAnswer {
            question_id: String::new(),
            reason: format!("at most {MAX_ANSWERS} answers are accepted"),
        });
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for answer in answers {
        if answer.question_id.trim().is_empty() {
            return Err(DomainError::InvalidAnswer {
                question_id: answer.question_id.clone(),
                reason: String::from("question id cannot be empty"),
            });
        }

        if !seen.insert(answer.question_id.as_str()) {
            return Err(DomainError::DuplicateQuestion(answer.question_id.clone()));
        }

        match &answer.value {
            AnswerValue::Number(n) if !n.as_f64().is_some_and(f64::is_finite) => {
                return Err(DomainError::InvalidAnswer {
                    question_id: answer.question_id.clone(),
                    reason: String::from("numeric answers must be finite"),
                });
            }
            AnswerValue::Text(text) if text.chars().count() > MAX_TEXT_ANSWER_LENGTH => {
                return Err(DomainError::InvalidAnswer {
                    question_id: answer.question_id.clone(),
                    reason: format!(
                        "text answers are limited to {MAX_TEXT_ANSWER_LENGTH} characters"
                    ),
                });
            }
            AnswerValue::Choices(choices) if choices.iter().any(|c| c.trim().is_empty()) => {
                return Err(DomainError::InvalidAnswer {
                    question_id: answer.question_id.clone(),
                    reason: String::from("choices cannot be empty"),
                });
            }
            _ => {}
        }
    }

    Ok(())
}

/// Validates review settings at creation.
///
/// # Errors
///
/// Returns an error if neither track is required; such a review could reach
/// acknowledgment without anyone submitting.
pub fn validate_settings(settings: &ReviewSettings) -> Result<(), DomainError> {
    if !settings.self_review_required && !settings.manager_review_required {
        return Err(DomainError::InvalidSettings(String::from(
            "at least one of the self or manager review must be required",
        )));
    }
    Ok(())
}

/// Validates an optional review reason.
///
/// # Errors
///
/// Returns an error if the reason is blank or too long.
pub fn validate_reason(reason: Option<&str>) -> Result<(), DomainError> {
    let Some(reason) = reason else {
        return Ok(());
    };

    if reason.trim().is_empty() {
        return Err(DomainError::InvalidReason(String::from(
            "Reason cannot be blank when given",
        )));
    }

    if reason.chars().count() > MAX_REASON_LENGTH {
        return Err(DomainError::InvalidReason(format!(
            "Reason is limited to {MAX_REASON_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Validates an optional free-text comment field.
///
/// # Errors
///
/// Returns an error if the comment exceeds `MAX_COMMENTS_LENGTH`.
pub fn validate_comments(field: &'static str, comments: Option<&str>) -> Result<(), DomainError> {
    match comments {
        Some(text) if text.chars().count() > MAX_COMMENTS_LENGTH => {
            Err(DomainError::InvalidComments {
                field,
                reason: format!("limited to {MAX_COMMENTS_LENGTH} characters"),
            })
        }
        _ => Ok(()),
    }
}

/// Validates an e-mail address.
///
/// Only the shape is checked: one `@`, a non-empty local part and a domain
/// containing a dot.
///
/// # Errors
///
/// Returns `DomainError::InvalidEmail` if the address is malformed.
pub fn validate_email(email: &str) -> Result<(), DomainError> {
    let trimmed: &str = email.trim();
    let Some((local, domain)) = trimmed.split_once('@') else {
        return Err(DomainError::InvalidEmail(format!("'{email}' has no '@'")));
    };

    if local.is_empty()
        || domain.contains('@')
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || trimmed.chars().any(char::is_whitespace)
    {
        return Err(DomainError::InvalidEmail(format!(
            "'{email}' is not a valid address"
        )));
    }

    Ok(())
}

/// Validates an employee's basic field constraints.
///
/// It does NOT check e-mail uniqueness or that the manager exists
/// (that requires context).
///
/// # Errors
///
/// Returns an error if:
/// - The name is empty
/// - The e-mail is malformed
/// - The employee is their own manager
pub fn validate_employee_fields(employee: &Employee) -> Result<(), DomainError> {
    if employee.name.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Name cannot be empty",
        )));
    }

    validate_email(&employee.email)?;

    if let (Some(id), Some(manager_id)) = (employee.employee_id, employee.manager_id)
        && id == manager_id
    {
        return Err(DomainError::InvalidManager {
            employee_id: id,
            reason: String::from("an employee cannot manage themselves"),
        });
    }

    Ok(())
}

/// Parses a calendar date in `YYYY-MM-DD` form.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string is not a valid date.
pub fn parse_due_date(value: &str) -> Result<Date, DomainError> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(value, &format).map_err(|e| DomainError::DateParseError {
        date_string: value.to_string(),
        error: e.to_string(),
    })
}
