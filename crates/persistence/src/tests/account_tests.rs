// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{PersistenceError, SqlitePersistence};
use perfdesk_domain::Role;
use time::{Duration, OffsetDateTime};

const PASSWORD: &str = "Correct-Horse-42";

#[test]
fn test_account_password_is_hashed() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let id = persistence
        .create_account(
            "pat@example.com",
            PASSWORD,
            Role::Hr,
            None,
            OffsetDateTime::now_utc(),
        )
        .unwrap();

    let account = persistence.get_account_by_id(id).unwrap().unwrap();
    assert_ne!(account.password_hash, PASSWORD);
    assert!(
        persistence
            .verify_password(PASSWORD, &account.password_hash)
            .unwrap()
    );
    assert!(
        !persistence
            .verify_password("wrong", &account.password_hash)
            .unwrap()
    );
    assert_eq!(account.role, Role::Hr);
    assert_eq!(account.failed_login_attempts, 0);
    assert!(!account.is_disabled);
}

#[test]
fn test_email_lookup_ignores_case() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    persistence
        .create_account(
            "Pat@Example.com",
            PASSWORD,
            Role::Manager,
            None,
            OffsetDateTime::now_utc(),
        )
        .unwrap();

    let account = persistence.get_account_by_email("PAT@example.COM").unwrap();
    assert_eq!(
        account.map(|a| a.email),
        Some(String::from("pat@example.com"))
    );
}

#[test]
fn test_duplicate_account_email_is_rejected() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let now = OffsetDateTime::now_utc();
    persistence
        .create_account("pat@example.com", PASSWORD, Role::Hr, None, now)
        .unwrap();
    let result = persistence.create_account("PAT@example.com", PASSWORD, Role::Hr, None, now);
    assert!(matches!(result, Err(PersistenceError::Duplicate(_))));
}

#[test]
fn test_account_linked_to_missing_employee_is_rejected() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let result = persistence.create_account(
        "pat@example.com",
        PASSWORD,
        Role::Employee,
        Some(77),
        OffsetDateTime::now_utc(),
    );
    assert!(matches!(result, Err(PersistenceError::ForeignKeyViolation(_))));
}

#[test]
fn test_lockout_fields_round_trip() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let now = OffsetDateTime::now_utc();
    let id = persistence
        .create_account("pat@example.com", PASSWORD, Role::Hr, None, now)
        .unwrap();

    let until = now + Duration::minutes(15);
    persistence.record_failed_login(id, 5, Some(until)).unwrap();
    let locked = persistence.get_account_by_id(id).unwrap().unwrap();
    assert_eq!(locked.failed_login_attempts, 5);
    assert!(locked.is_locked_at(now));
    assert!(!locked.is_locked_at(until + Duration::seconds(1)));

    persistence.record_successful_login(id, now).unwrap();
    let cleared = persistence.get_account_by_id(id).unwrap().unwrap();
    assert_eq!(cleared.failed_login_attempts, 0);
    assert!(cleared.locked_until.is_none());
    assert!(cleared.last_login_at.is_some());
}

#[test]
fn test_disable_account() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let id = persistence
        .create_account(
            "pat@example.com",
            PASSWORD,
            Role::Hr,
            None,
            OffsetDateTime::now_utc(),
        )
        .unwrap();

    persistence.set_account_disabled(id, true).unwrap();
    assert!(persistence.get_account_by_id(id).unwrap().unwrap().is_disabled);

    assert!(matches!(
        persistence.set_account_disabled(999, true),
        Err(PersistenceError::NotFound(_))
    ));
}
