// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 OTPVault contributors

//! Domain layer: pure data types shared between UI, storage, and import logic.

pub mod export;
pub mod password;
