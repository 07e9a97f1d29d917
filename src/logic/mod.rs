// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 OTPVault contributors

//! Business logic: archive import, keyboard inset tracking, and OTP codes.

pub mod import;
pub mod keyboard;
pub mod otp;
