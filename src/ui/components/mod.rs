// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 OTPVault contributors

//! Reusable egui components structured for MVU-style updates.

pub mod import;
pub mod keyboard_inset;
pub mod passwords;
