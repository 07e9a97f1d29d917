// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 OTPVault contributors

//! Stored OTP credential and the text-to-value coercions used when importing.

use uuid::Uuid;

use crate::models::export::ExportedPassword;

/// One OTP credential as kept in the local store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Password {
    /// Primary key, freshly generated for every new record.
    pub id: String,
    pub issuer: String,
    pub account: String,
    pub icon_type: String,
    pub icon_value: String,
    /// Base32 encoded shared secret.
    pub secret: String,
    /// Hash algorithm name, e.g. `SHA1`.
    pub algorithm: String,
    pub digits: i64,
    /// `TOTP` or `HOTP`.
    pub kind: String,
    /// TOTP period in seconds.
    pub timer: i64,
    /// HOTP counter value.
    pub counter: i64,
    pub pinned: bool,
    /// Waiting for an outbound sync.
    pub syncing: bool,
    /// Confirmed by the remote side.
    pub synced: bool,
}

impl Password {
    /// Generate a new unique primary key.
    pub fn new_primary_key() -> String {
        Uuid::new_v4().to_string()
    }

    /// Build a brand-new record from an exported entry.
    ///
    /// Numeric and boolean fields are plain text in the export; anything that
    /// does not parse falls back to `0` / `false`. The record is flagged as
    /// needing an outbound sync.
    pub fn from_export(item: &ExportedPassword) -> Self {
        Self {
            id: Self::new_primary_key(),
            issuer: item.issuer.clone(),
            account: item.account.clone(),
            icon_type: item.icon_type.clone(),
            icon_value: item.icon_value.clone(),
            secret: item.secret.clone(),
            algorithm: item.algorithm.clone(),
            digits: parse_int_or_zero(&item.digits),
            kind: item.kind.clone(),
            timer: parse_int_or_zero(&item.timer),
            counter: parse_int_or_zero(&item.counter),
            pinned: parse_bool_or_false(&item.pinned),
            syncing: true,
            synced: false,
        }
    }

    /// Label shown in lists: `issuer (account)` or whichever part exists.
    pub fn display_name(&self) -> String {
        match (self.issuer.trim(), self.account.trim()) {
            ("", "") => "Unnamed".to_string(),
            (issuer, "") => issuer.to_string(),
            ("", account) => account.to_string(),
            (issuer, account) => format!("{issuer} ({account})"),
        }
    }
}

/// Integer text to value; invalid input becomes `0`.
pub fn parse_int_or_zero(raw: &str) -> i64 {
    raw.parse::<i64>().unwrap_or(0)
}

/// Exactly `"true"` or `"false"`; anything else becomes `false`.
pub fn parse_bool_or_false(raw: &str) -> bool {
    raw.parse::<bool>().unwrap_or(false)
}
