// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 OTPVault contributors

//! Raivo OTP export payload: a JSON array of flat, text-only records.

use serde::Deserialize;

/// Name of the JSON entry inside a Raivo OTP export archive.
pub const EXPORT_ENTRY_NAME: &str = "raivo-otp-export.json";

/// One exported credential. Every field is text, even the numeric ones.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExportedPassword {
    pub pinned: String,
    pub icon_value: String,
    pub secret: String,
    pub issuer: String,
    pub counter: String,
    pub account: String,
    pub icon_type: String,
    pub algorithm: String,
    pub kind: String,
    pub digits: String,
    pub timer: String,
}

/// Decode the export payload. Unknown keys are ignored; a missing key or a
/// non-string value is an error.
pub fn parse_export(data: &[u8]) -> serde_json::Result<Vec<ExportedPassword>> {
    serde_json::from_slice(data)
}
