// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 OTPVault contributors

//! SQLite-backed [`PasswordStore`].

use std::fs;
use std::path::Path;

use rusqlite::{Connection, params};

use super::{PasswordStore, Result};
use crate::models::password::Password;

/// Credential store kept in a single SQLite database file.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `path`, creating parent directories.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Volatile store, used by tests.
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        create_table(&conn)?;
        Ok(Self { conn })
    }
}

fn create_table(conn: &Connection) -> Result<()> {
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS passwords (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,
            issuer TEXT NOT NULL,
            account TEXT NOT NULL,
            icon_type TEXT NOT NULL,
            icon_value TEXT NOT NULL,
            secret TEXT NOT NULL,
            algorithm TEXT NOT NULL,
            digits INTEGER NOT NULL,
            kind TEXT NOT NULL,
            timer INTEGER NOT NULL,
            counter INTEGER NOT NULL,
            pinned INTEGER NOT NULL DEFAULT 0,
            syncing INTEGER NOT NULL DEFAULT 0,
            synced INTEGER NOT NULL DEFAULT 0
        )
        "#,
        [],
    )?;
    Ok(())
}

impl PasswordStore for SqliteStore {
    fn insert(&mut self, password: &Password) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            r#"
            INSERT INTO passwords
                (id, issuer, account, icon_type, icon_value, secret, algorithm,
                 digits, kind, timer, counter, pinned, syncing, synced)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
            params![
                password.id,
                password.issuer,
                password.account,
                password.icon_type,
                password.icon_value,
                password.secret,
                password.algorithm,
                password.digits,
                password.kind,
                password.timer,
                password.counter,
                password.pinned as i32,
                password.syncing as i32,
                password.synced as i32,
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn list(&self) -> Result<Vec<Password>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, issuer, account, icon_type, icon_value, secret, algorithm,
                   digits, kind, timer, counter, pinned, syncing, synced
            FROM passwords
            ORDER BY seq
            "#,
        )?;
        let rows = stmt
            .query_map([], row_to_password)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

fn row_to_password(row: &rusqlite::Row) -> rusqlite::Result<Password> {
    Ok(Password {
        id: row.get(0)?,
        issuer: row.get(1)?,
        account: row.get(2)?,
        icon_type: row.get(3)?,
        icon_value: row.get(4)?,
        secret: row.get(5)?,
        algorithm: row.get(6)?,
        digits: row.get(7)?,
        kind: row.get(8)?,
        timer: row.get(9)?,
        counter: row.get(10)?,
        pinned: row.get::<_, i32>(11)? != 0,
        syncing: row.get::<_, i32>(12)? != 0,
        synced: row.get::<_, i32>(13)? != 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample(issuer: &str) -> Password {
        Password {
            id: Password::new_primary_key(),
            issuer: issuer.into(),
            account: "me".into(),
            icon_type: "none".into(),
            icon_value: "".into(),
            secret: "ABC123".into(),
            algorithm: "SHA1".into(),
            digits: 6,
            kind: "TOTP".into(),
            timer: 30,
            counter: 0,
            pinned: true,
            syncing: true,
            synced: false,
        }
    }

    #[test]
    fn insert_and_list_preserves_fields_and_order() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let first = sample("GitHub");
        let second = sample("GitLab");

        store.insert(&first).unwrap();
        store.insert(&second).unwrap();

        let stored = store.list().unwrap();
        assert_eq!(stored, vec![first, second]);
    }

    #[test]
    fn duplicate_key_is_rejected() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let password = sample("GitHub");

        store.insert(&password).unwrap();
        assert!(store.insert(&password).is_err());
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn open_creates_parent_directories_and_persists() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("vault.sqlite");

        {
            let mut store = SqliteStore::open(&path).unwrap();
            store.insert(&sample("GitHub")).unwrap();
        }

        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(reopened.list().unwrap().len(), 1);
    }
}
