// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::is_review_visible;
use crate::tests::helpers::{MANAGER_ID, SUBJECT_ID, TRIGGER_ACCOUNT_ID, create_test_review};
use perfdesk_domain::{AdhocReview, ReviewSettings, Role};

#[test]
fn test_administrators_see_every_review() {
    let review: AdhocReview = create_test_review(ReviewSettings::default());
    assert!(is_review_visible(&review, Role::Admin, 500, None));
    assert!(is_review_visible(&review, Role::Hr, 500, None));
}

#[test]
fn test_participants_see_their_review() {
    let review: AdhocReview = create_test_review(ReviewSettings::default());
    assert!(is_review_visible(&review, Role::Employee, 500, Some(SUBJECT_ID)));
    assert!(is_review_visible(&review, Role::Manager, 501, Some(MANAGER_ID)));
    assert!(is_review_visible(&review, Role::Manager, TRIGGER_ACCOUNT_ID, None));
}

#[test]
fn test_outsiders_do_not_see_review() {
    let review: AdhocReview = create_test_review(ReviewSettings::default());
    assert!(!is_review_visible(&review, Role::Employee, 500, Some(999)));
    assert!(!is_review_visible(&review, Role::Manager, 500, None));
}
