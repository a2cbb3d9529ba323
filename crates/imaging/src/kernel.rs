// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fingerprinting and dimension probing

use crate::ImagingError;
use image::ImageReader;
use sha2::{Digest, Sha256};
use std::io::Cursor;

/// SHA-256 hex fingerprint of the raw source bytes.
///
/// Hashes the encoded bytes, not decoded pixels, so re-encodes of the same
/// picture fingerprint differently.
pub fn image_hash(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Intrinsic `(width, height)` of an encoded image.
///
/// Reads only the header; the pixel data is not decoded.
pub fn probe(bytes: &[u8]) -> Result<(u32, u32), ImagingError> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    Ok(reader.into_dimensions()?)
}

#[cfg(test)]
#[path = "kernel_tests.rs"]
mod tests;
