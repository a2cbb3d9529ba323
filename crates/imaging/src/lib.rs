// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tess-imaging: pure, deterministic image kernel
//!
//! Fingerprinting, dimension probing, grid suggestion, and tile slicing.
//! Everything here is CPU-bound and side-effect free; callers dispatch to a
//! blocking pool.

mod grid_fit;
mod kernel;
mod slice;

pub use grid_fit::suggest_grids;
pub use kernel::{image_hash, probe};
pub use slice::{padding_px, slice, Tile};

use thiserror::Error;

/// Errors from image decoding and encoding
#[derive(Debug, Error)]
pub enum ImagingError {
    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),

    #[error("image probe failed: {0}")]
    Probe(#[from] std::io::Error),
}

impl tess_core::Failure for ImagingError {
    fn kind(&self) -> tess_core::FailureKind {
        tess_core::FailureKind::InputInvalid
    }
}
