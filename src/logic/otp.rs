// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 OTPVault contributors

//! HOTP (RFC 4226) and TOTP (RFC 6238) code generation.

use base32::Alphabet;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha512};

use crate::models::password::Password;

/// Reasons a stored credential cannot produce a code.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OtpError {
    #[error("Secret is not valid base32")]
    InvalidSecret,
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("Unsupported OTP kind: {0}")]
    UnsupportedKind(String),
    #[error("Digit count must be between 1 and 10, got {0}")]
    InvalidDigits(i64),
    #[error("Timer period must be positive, got {0}")]
    InvalidTimer(i64),
    #[error("Counter must not be negative, got {0}")]
    InvalidCounter(i64),
}

/// HMAC hash used by a credential.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    Sha1,
    Sha256,
    Sha512,
}

impl Algorithm {
    /// Parse names like `SHA1`, `sha256`, or `SHA-512`.
    pub fn parse(raw: &str) -> Result<Self, OtpError> {
        match raw.trim().to_ascii_uppercase().replace('-', "").as_str() {
            "SHA1" => Ok(Self::Sha1),
            "SHA256" => Ok(Self::Sha256),
            "SHA512" => Ok(Self::Sha512),
            _ => Err(OtpError::UnsupportedAlgorithm(raw.to_string())),
        }
    }
}

/// Time-based or counter-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OtpKind {
    Totp,
    Hotp,
}

impl OtpKind {
    pub fn parse(raw: &str) -> Result<Self, OtpError> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "TOTP" => Ok(Self::Totp),
            "HOTP" => Ok(Self::Hotp),
            _ => Err(OtpError::UnsupportedKind(raw.to_string())),
        }
    }
}

/// Decode a base32 secret, tolerating lowercase, spaces, and padding.
pub fn decode_secret(secret: &str) -> Result<Vec<u8>, OtpError> {
    let normalized: String = secret
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '=' && *c != '-')
        .map(|c| c.to_ascii_uppercase())
        .collect();
    if normalized.is_empty() {
        return Err(OtpError::InvalidSecret);
    }
    base32::decode(Alphabet::RFC4648 { padding: false }, &normalized)
        .ok_or(OtpError::InvalidSecret)
}

/// Counter-based code for a raw key.
pub fn hotp(key: &[u8], counter: u64, digits: u32, algorithm: Algorithm) -> String {
    let digest = match algorithm {
        Algorithm::Sha1 => hmac_digest::<Hmac<Sha1>>(key, counter),
        Algorithm::Sha256 => hmac_digest::<Hmac<Sha256>>(key, counter),
        Algorithm::Sha512 => hmac_digest::<Hmac<Sha512>>(key, counter),
    };

    // Dynamic truncation.
    let offset = (digest[digest.len() - 1] & 0x0f) as usize;
    let binary = ((u32::from(digest[offset]) & 0x7f) << 24)
        | (u32::from(digest[offset + 1]) << 16)
        | (u32::from(digest[offset + 2]) << 8)
        | u32::from(digest[offset + 3]);

    let modulus = 10u64.pow(digits);
    let code = u64::from(binary) % modulus;
    format!("{:0width$}", code, width = digits as usize)
}

/// Time-based code: HOTP over `unix_time / period`.
pub fn totp(key: &[u8], unix_time: i64, period: u64, digits: u32, algorithm: Algorithm) -> String {
    let step = unix_time.max(0) as u64 / period;
    hotp(key, step, digits, algorithm)
}

fn hmac_digest<M: Mac + hmac::digest::KeyInit>(key: &[u8], counter: u64) -> Vec<u8> {
    // HMAC accepts keys of any length.
    let mut mac = <M as hmac::digest::KeyInit>::new_from_slice(key)
        .unwrap_or_else(|_| unreachable!("HMAC takes keys of any size"));
    mac.update(&counter.to_be_bytes());
    mac.finalize().into_bytes().to_vec()
}

/// Current code for a stored credential.
///
/// TOTP credentials derive the counter from `unix_time` and the stored timer;
/// HOTP credentials use the stored counter. Records imported with invalid
/// numeric fields (stored as zero) fail with the matching [`OtpError`] rather
/// than producing a code.
pub fn code_for(password: &Password, unix_time: i64) -> Result<String, OtpError> {
    let digits = validate_digits(password.digits)?;
    let algorithm = Algorithm::parse(&password.algorithm)?;
    let key = decode_secret(&password.secret)?;

    match OtpKind::parse(&password.kind)? {
        OtpKind::Totp => {
            let period = validate_timer(password.timer)?;
            Ok(totp(&key, unix_time, period, digits, algorithm))
        }
        OtpKind::Hotp => {
            let counter =
                u64::try_from(password.counter).map_err(|_| OtpError::InvalidCounter(password.counter))?;
            Ok(hotp(&key, counter, digits, algorithm))
        }
    }
}

/// Seconds left before a TOTP code rolls over. `None` for HOTP or bad timers.
pub fn seconds_remaining(password: &Password, unix_time: i64) -> Option<u64> {
    if OtpKind::parse(&password.kind).ok()? != OtpKind::Totp {
        return None;
    }
    let period = validate_timer(password.timer).ok()?;
    Some(period - (unix_time.max(0) as u64 % period))
}

fn validate_digits(digits: i64) -> Result<u32, OtpError> {
    match digits {
        1..=10 => Ok(digits as u32),
        other => Err(OtpError::InvalidDigits(other)),
    }
}

fn validate_timer(timer: i64) -> Result<u64, OtpError> {
    if timer > 0 {
        Ok(timer as u64)
    } else {
        Err(OtpError::InvalidTimer(timer))
    }
}
