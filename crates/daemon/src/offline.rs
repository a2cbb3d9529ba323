// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stand-in sticker API for running without a chat transport

use async_trait::async_trait;
use tess_adapters::{StickerApi, StickerApiError, StickerSet};
use tess_core::UserId;

/// Answers every remote call with a network failure.
///
/// The chat transport owns the real connection to the sticker service and
/// injects its own [`StickerApi`] when it embeds the container; the
/// standalone `tessd` binary runs the store, sweeper, and queue lifecycle
/// with this stub in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineStickerApi;

impl OfflineStickerApi {
    pub fn new() -> Self {
        Self
    }

    fn offline<T>() -> Result<T, StickerApiError> {
        Err(StickerApiError::Network("sticker transport is not connected".to_string()))
    }
}

#[async_trait]
impl StickerApi for OfflineStickerApi {
    async fn upload_sticker_file(
        &self,
        _user_id: UserId,
        _png: Vec<u8>,
    ) -> Result<String, StickerApiError> {
        Self::offline()
    }

    async fn get_sticker_set(&self, _name: &str) -> Result<StickerSet, StickerApiError> {
        Self::offline()
    }

    async fn add_sticker_to_set(
        &self,
        _user_id: UserId,
        _name: &str,
        _file_id: &str,
    ) -> Result<(), StickerApiError> {
        Self::offline()
    }

    async fn create_new_sticker_set(
        &self,
        _user_id: UserId,
        _name: &str,
        _title: &str,
        _file_ids: &[String],
    ) -> Result<(), StickerApiError> {
        Self::offline()
    }
}
