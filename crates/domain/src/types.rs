// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Account roles.
///
/// Roles govern who may initiate and administer reviews. Submitting a
/// review track is governed by identity (employee id), not by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full administrative authority.
    Admin,
    /// Human resources staff.
    Hr,
    /// People managers.
    Manager,
    /// Regular employees.
    Employee,
}

impl Role {
    /// Returns the string representation used for persistence and tokens.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Hr => "hr",
            Self::Manager => "manager",
            Self::Employee => "employee",
        }
    }

    /// Returns true if this role may trigger an ad-hoc review.
    #[must_use]
    pub const fn can_initiate_reviews(&self) -> bool {
        matches!(self, Self::Admin | Self::Hr | Self::Manager)
    }

    /// Returns true if this role administers all reviews.
    #[must_use]
    pub const fn is_review_administrator(&self) -> bool {
        matches!(self, Self::Admin | Self::Hr)
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "hr" => Ok(Self::Hr),
            "manager" => Ok(Self::Manager),
            "employee" => Ok(Self::Employee),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const fn default_true() -> bool {
    true
}

/// Per-review requirements, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSettings {
    /// Whether the subject employee must submit a self review.
    #[serde(default = "default_true", alias = "self_review_required")]
    pub self_review_required: bool,
    /// Whether the assigned manager must submit a manager review.
    #[serde(default = "default_true", alias = "manager_review_required")]
    pub manager_review_required: bool,
    /// Whether the subject's goals are shown alongside the review form.
    #[serde(default = "default_true", alias = "include_goals")]
    pub include_goals: bool,
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            self_review_required: true,
            manager_review_required: true,
            include_goals: true,
        }
    }
}

/// An entry in the employee directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// The canonical identifier assigned by the database.
    /// `None` indicates the employee has not been persisted yet.
    pub employee_id: Option<i64>,
    /// Display name.
    pub name: String,
    /// Work e-mail address.
    pub email: String,
    /// Optional department label.
    pub department: Option<String>,
    /// The employee's line manager, if any.
    pub manager_id: Option<i64>,
}

impl Employee {
    /// Creates a new, not yet persisted, employee.
    #[must_use]
    pub const fn new(
        name: String,
        email: String,
        department: Option<String>,
        manager_id: Option<i64>,
    ) -> Self {
        Self {
            employee_id: None,
            name,
            email,
            department,
            manager_id,
        }
    }

    /// Returns a copy of this employee carrying its persisted id.
    #[must_use]
    pub const fn with_id(mut self, employee_id: i64) -> Self {
        self.employee_id = Some(employee_id);
        self
    }
}
