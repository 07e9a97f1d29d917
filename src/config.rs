// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 OTPVault contributors

//! Application configuration loaded from `config.toml`.
//!
//! The file lives in the platform config directory (or at the path given by
//! `OTPVAULT_CONFIG`). Every key is optional; a missing file means defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;

const CONFIG_PATH_ENV: &str = "OTPVAULT_CONFIG";
const CONFIG_FILE_NAME: &str = "config.toml";
const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "OTPVault";
const APP_NAME: &str = "otpvault";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
}

/// Top-level settings.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// SQLite file holding the stored credentials.
    pub database_path: PathBuf,
    /// Scratch space for archive extraction.
    pub cache_dir: PathBuf,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
    pub soft_keyboard: SoftKeyboardConfig,
}

/// Emulated on-screen keyboard for touch-screen desktops.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SoftKeyboardConfig {
    pub enabled: bool,
    /// Keyboard height in points.
    pub height: f32,
    /// Seconds per show/hide animation.
    pub animation_duration: f64,
    /// Raw curve identifier (0 ease-in-out, 1 ease-in, 2 ease-out, 3 linear).
    pub animation_curve: u32,
    /// Bottom area already reserved by the platform.
    pub safe_area_bottom: f32,
}

impl Default for SoftKeyboardConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            height: 280.0,
            animation_duration: 0.25,
            animation_curve: 7,
            safe_area_bottom: 0.0,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let (data_dir, cache_dir) = match project_dirs() {
            Some(dirs) => (
                dirs.data_local_dir().to_path_buf(),
                dirs.cache_dir().to_path_buf(),
            ),
            None => (PathBuf::from(".otpvault"), PathBuf::from(".otpvault/cache")),
        };

        Self {
            database_path: data_dir.join("vault.sqlite"),
            cache_dir,
            log_filter: "otpvault=info".to_string(),
            soft_keyboard: SoftKeyboardConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load settings from `OTPVAULT_CONFIG` or the platform config directory.
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Parse a TOML file; absent keys fall back to defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::from_toml(&raw).with_context(|| format!("Invalid config file {:?}", path))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }
}

fn config_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_toml_overrides_only_given_keys() {
        let config = AppConfig::from_toml(
            r#"
            database_path = "/tmp/vault.sqlite"

            [soft_keyboard]
            enabled = true
            height = 300.0
            "#,
        )
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/vault.sqlite"));
        assert!(config.soft_keyboard.enabled);
        assert_eq!(config.soft_keyboard.height, 300.0);
        assert_eq!(config.soft_keyboard.animation_duration, 0.25);
        assert_eq!(config.log_filter, "otpvault=info");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(AppConfig::from_toml("colour = \"blue\"").is_err());
    }

    #[test]
    fn from_file_reports_path_on_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "database_path = 5").unwrap();

        let err = AppConfig::from_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("config.toml"));
    }
}
