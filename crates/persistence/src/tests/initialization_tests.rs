// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{PersistenceError, SqlitePersistence};
use time::OffsetDateTime;

#[test]
fn test_in_memory_databases_are_isolated() {
    let mut first = SqlitePersistence::new_in_memory().unwrap();
    let mut second = SqlitePersistence::new_in_memory().unwrap();

    first
        .bootstrap_admin(
            "admin@example.com",
            "Correct-Horse-42",
            OffsetDateTime::now_utc(),
        )
        .unwrap();

    assert_eq!(first.count_accounts().unwrap(), 1);
    assert_eq!(second.count_accounts().unwrap(), 0);
}

#[test]
fn test_foreign_keys_are_enforced() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    persistence.verify_foreign_key_enforcement().unwrap();
}

#[test]
fn test_file_database_survives_reopen() {
    let path = std::env::temp_dir().join(format!(
        "perfdesk-init-{}-{}.db",
        std::process::id(),
        OffsetDateTime::now_utc().unix_timestamp_nanos()
    ));

    {
        let mut persistence = SqlitePersistence::new_with_file(&path).unwrap();
        persistence
            .bootstrap_admin(
                "admin@example.com",
                "Correct-Horse-42",
                OffsetDateTime::now_utc(),
            )
            .unwrap();
    }

    let mut reopened = SqlitePersistence::new_with_file(&path).unwrap();
    assert_eq!(reopened.count_accounts().unwrap(), 1);
    drop(reopened);

    for suffix in ["", "-wal", "-shm"] {
        let mut file = path.clone().into_os_string();
        file.push(suffix);
        let _ = std::fs::remove_file(file);
    }
}

#[test]
fn test_bootstrap_only_once() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let now = OffsetDateTime::now_utc();

    persistence
        .bootstrap_admin("admin@example.com", "Correct-Horse-42", now)
        .unwrap();
    let result = persistence.bootstrap_admin("other@example.com", "Correct-Horse-42", now);

    assert_eq!(result, Err(PersistenceError::AlreadyBootstrapped));
}
