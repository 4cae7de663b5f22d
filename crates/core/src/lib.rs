// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod apply;
mod command;
mod error;
mod state;

#[cfg(test)]
mod tests;

use perfdesk_domain::{AdhocReview, Role};

// Re-export public types and functions
pub use apply::{apply, apply_create};
pub use command::Command;
pub use error::CoreError;
pub use state::{TransitionResult, review_snapshot};

/// Returns true if a caller may see the given review.
///
/// Review administrators see everything; everyone else sees reviews they
/// are the subject, manager or initiator of.
///
/// This is a read-only check that does not create audit events.
#[must_use]
pub fn is_review_visible(
    review: &AdhocReview,
    role: Role,
    account_id: i64,
    employee_id: Option<i64>,
) -> bool {
    role.is_review_administrator() || review.involves(account_id, employee_id)
}
