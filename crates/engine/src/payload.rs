// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deep-link payload codec
//!
//! `base64url(salt4 ‖ unix_secs_be4 ‖ link_id_be)` without padding. The
//! salt and timestamp make every issued payload unique so the platform
//! never caches a deep link; decode skips both and reads the remainder as
//! a big-endian id.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use thiserror::Error;

pub const MAX_PAYLOAD_LEN: usize = 64;
const PREFIX_BYTES: usize = 8; // 4 salt + 4 timestamp

/// Errors from payload encoding/decoding
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("link id must be non-negative")]
    NegativeId,

    #[error("payload must be 1..={MAX_PAYLOAD_LEN} characters")]
    BadLength,

    #[error("payload is not valid base64url")]
    Malformed,

    #[error("payload is too short")]
    TooShort,
}

/// Encode `link_id` into a salted, URL-safe payload (≤ 64 chars).
pub fn encode_link_id(link_id: i64) -> Result<String, PayloadError> {
    if link_id < 0 {
        return Err(PayloadError::NegativeId);
    }
    let mut combined = Vec::with_capacity(PREFIX_BYTES + 8);

    let mut salt = [0u8; 4];
    rand::thread_rng().fill_bytes(&mut salt);
    combined.extend_from_slice(&salt);

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let now = (chrono::Utc::now().timestamp() & 0xFFFF_FFFF) as u32;
    combined.extend_from_slice(&now.to_be_bytes());

    combined.extend_from_slice(minimal_be_bytes(link_id).as_slice());

    let encoded = URL_SAFE_NO_PAD.encode(&combined);
    if encoded.len() > MAX_PAYLOAD_LEN {
        return Err(PayloadError::BadLength);
    }
    Ok(encoded)
}

/// Recover the link id from a payload produced by [`encode_link_id`].
pub fn decode_payload(payload: &str) -> Result<i64, PayloadError> {
    if payload.is_empty() || payload.len() > MAX_PAYLOAD_LEN {
        return Err(PayloadError::BadLength);
    }
    let combined = URL_SAFE_NO_PAD.decode(payload).map_err(|_| PayloadError::Malformed)?;
    if combined.len() < PREFIX_BYTES {
        return Err(PayloadError::TooShort);
    }
    let id_bytes = &combined[PREFIX_BYTES..];
    if id_bytes.len() > 8 {
        return Err(PayloadError::Malformed);
    }
    let mut value: i64 = 0;
    for byte in id_bytes {
        value = value.checked_shl(8).ok_or(PayloadError::Malformed)? | i64::from(*byte);
        if value < 0 {
            return Err(PayloadError::Malformed);
        }
    }
    Ok(value)
}

/// Big-endian bytes of `id` with leading zeros stripped; zero encodes as
/// one zero byte.
fn minimal_be_bytes(id: i64) -> Vec<u8> {
    let bytes = id.to_be_bytes();
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len() - 1);
    bytes[first..].to_vec()
}

#[cfg(test)]
#[path = "payload_tests.rs"]
mod tests;
