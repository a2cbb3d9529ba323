// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tess-adapters: remote-service plumbing
//!
//! The retry driver and the sticker-service client. The remote API surface
//! is a trait so tests run against an in-memory fake.

pub mod retry;
pub mod sticker;

pub use retry::{retry, RetryPolicy};
pub use sticker::{
    PackClient, RemoteSticker, StickerApi, StickerApiError, StickerClientError, StickerSet,
};

#[cfg(any(test, feature = "test-support"))]
pub use sticker::FakeStickerApi;
