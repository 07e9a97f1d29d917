// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 OTPVault contributors

//! Import of Raivo OTP export archives.
//!
//! The pipeline runs four stages and stops at the first failure:
//! 1. verify the password against the archive without extracting it,
//! 2. decrypt the archive into a scratch directory and read the export entry,
//! 3. decode the JSON payload,
//! 4. store every entry as a new credential, one transaction each.
//!
//! Records written before a storage failure stay committed.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use zip::ZipArchive;
use zip::result::ZipError;

use crate::models::export::{EXPORT_ENTRY_NAME, parse_export};
use crate::models::password::Password;
use crate::storage::{PasswordStore, StorageError};

/// Prefix of the per-import scratch directory.
const SCRATCH_PREFIX: &str = "raivo-otp-export";

/// Caller-facing import failures. `Display` yields the message shown to users.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Password incorrect")]
    PasswordIncorrect,

    #[error("Not a Raivo OTP export archive")]
    NotAnExportArchive,

    #[error("Could not parse JSON data")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Given JSON data is empty")]
    EmptyJson,

    #[error("Could not save imported passwords ({imported} saved before the failure)")]
    Storage {
        imported: usize,
        #[source]
        source: StorageError,
    },
}

/// Imports export archives, extracting into `cache_dir`.
#[derive(Clone, Debug)]
pub struct DataImport {
    cache_dir: PathBuf,
}

impl DataImport {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// Import every credential in the archive at `archive` into `store`.
    ///
    /// Returns the number of records written. Blocks on file I/O and
    /// decryption; run it off the UI thread.
    pub fn import_archive(
        &self,
        archive: &Path,
        password: &str,
        store: &mut dyn PasswordStore,
    ) -> std::result::Result<usize, ImportError> {
        tracing::info!(archive = %archive.display(), "Importing export archive");

        if !is_password_valid(archive, password) {
            return Err(ImportError::PasswordIncorrect);
        }

        let data = self
            .read_file_from_archive(archive, EXPORT_ENTRY_NAME, password)
            .map_err(|err| {
                tracing::error!("Could not read export entry from archive: {err:#}");
                ImportError::NotAnExportArchive
            })?;

        import_new_passwords(&data, store)
    }

    /// Decrypt the whole archive into a fresh scratch directory and read
    /// `file_name` from it. The scratch directory is always removed; failing to
    /// remove it is logged and ignored.
    fn read_file_from_archive(
        &self,
        archive: &Path,
        file_name: &str,
        password: &str,
    ) -> Result<Vec<u8>> {
        fs::create_dir_all(&self.cache_dir)
            .with_context(|| format!("Failed to create cache directory {:?}", self.cache_dir))?;
        let scratch = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir_in(&self.cache_dir)
            .context("Failed to create scratch directory")?;

        let result = extract_archive(archive, scratch.path(), password).and_then(|_| {
            let target = scratch.path().join(file_name);
            if !target.is_file() {
                return Err(anyhow!("{file_name} does not exist in the extracted archive"));
            }
            fs::read(&target).with_context(|| format!("Failed to read {:?}", target))
        });

        let scratch_path = scratch.path().to_path_buf();
        if let Err(err) = scratch.close() {
            tracing::warn!(path = %scratch_path.display(), "Could not remove scratch directory: {err}");
        }

        result
    }
}

/// Check `password` against every encrypted entry without reading contents.
///
/// Archives that cannot be opened at all count as a wrong password.
/// Unencrypted entries accept any password.
pub fn is_password_valid(archive: &Path, password: &str) -> bool {
    let check = || -> Result<bool> {
        let file = File::open(archive).with_context(|| format!("Failed to open {:?}", archive))?;
        let mut zip = ZipArchive::new(file).context("Failed to read ZIP directory")?;

        for index in 0..zip.len() {
            if !zip.by_index_raw(index)?.encrypted() {
                continue;
            }
            match zip.by_index_decrypt(index, password.as_bytes()) {
                Ok(_) => {}
                Err(ZipError::InvalidPassword) => return Ok(false),
                Err(err) => return Err(err.into()),
            }
        }
        Ok(true)
    };

    match check() {
        Ok(valid) => valid,
        Err(err) => {
            tracing::error!("Could not verify archive password: {err:#}");
            false
        }
    }
}

/// Decrypt every entry of `archive` below `destination`.
///
/// Entries whose names would escape `destination` are skipped.
fn extract_archive(archive: &Path, destination: &Path, password: &str) -> Result<()> {
    let file = File::open(archive).with_context(|| format!("Failed to open {:?}", archive))?;
    let mut zip = ZipArchive::new(file).context("Failed to read ZIP directory")?;

    for index in 0..zip.len() {
        let encrypted = zip.by_index_raw(index)?.encrypted();
        let opened = if encrypted {
            zip.by_index_decrypt(index, password.as_bytes())
        } else {
            zip.by_index(index)
        };
        let mut entry = opened.with_context(|| format!("Failed to open archive entry #{index}"))?;

        let Some(relative) = entry.enclosed_name() else {
            tracing::warn!(name = entry.name(), "Skipping archive entry with unsafe path");
            continue;
        };
        let out_path = destination.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)
                .with_context(|| format!("Failed to create directory {:?}", out_path))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }
        let mut out = File::create(&out_path)
            .with_context(|| format!("Failed to create {:?}", out_path))?;
        io::copy(&mut entry, &mut out)
            .with_context(|| format!("Failed to extract {:?}", out_path))?;
    }

    Ok(())
}

/// Decode the payload and store each entry as a new credential.
fn import_new_passwords(
    data: &[u8],
    store: &mut dyn PasswordStore,
) -> std::result::Result<usize, ImportError> {
    let items = parse_export(data).map_err(|err| {
        tracing::error!("Could not decode given JSON data: {err}");
        ImportError::InvalidJson(err)
    })?;

    if items.is_empty() {
        return Err(ImportError::EmptyJson);
    }

    for (imported, item) in items.iter().enumerate() {
        let password = Password::from_export(item);
        store.insert(&password).map_err(|source| {
            tracing::error!(imported, "Could not store imported password: {source}");
            ImportError::Storage { imported, source }
        })?;
    }

    tracing::info!(count = items.len(), "Imported passwords");
    Ok(items.len())
}
