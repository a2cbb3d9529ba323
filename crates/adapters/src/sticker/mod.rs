// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sticker-service adapter: remote API trait plus the pack client

mod api;
mod client;

pub use api::{RemoteSticker, StickerApi, StickerApiError, StickerSet};
pub use client::{PackClient, StickerClientError};

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeStickerApi;
