// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 OTPVault contributors

//! Local credential store.

pub mod sqlite;

use crate::models::password::Password;

pub use sqlite::SqliteStore;

/// Storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Could not prepare database location: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Write/read access to stored credentials.
pub trait PasswordStore {
    /// Persist one new record in its own transaction.
    fn insert(&mut self, password: &Password) -> Result<()>;

    /// All stored records, oldest first.
    fn list(&self) -> Result<Vec<Password>>;
}
