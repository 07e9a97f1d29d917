// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 OTPVault contributors

//! Shared helper utilities.

pub mod logging;

/// Install the global `tracing` subscriber.
pub use logging::init_tracing;
