// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote sticker-service API surface

use async_trait::async_trait;
use std::time::Duration;
use tess_core::UserId;
use thiserror::Error;

/// Failure categories the remote service reports.
#[derive(Debug, Clone, Error)]
pub enum StickerApiError {
    #[error("rate limited, retry after {0:?}")]
    RetryAfter(Duration),

    #[error("network failure: {0}")]
    Network(String),

    #[error("bad request: {0}")]
    BadRequest(String),
}

impl StickerApiError {
    /// True when the message carries the service's "no such set" signal.
    ///
    /// The service spells it two ways; both are matched case-insensitively.
    pub fn is_set_missing(&self) -> bool {
        match self {
            StickerApiError::BadRequest(message) => {
                let upper = message.to_ascii_uppercase();
                upper.contains("STICKER_SET_INVALID") || upper.contains("STICKERSET_INVALID")
            }
            _ => false,
        }
    }

    /// True when a retry may succeed. Rate limits and network faults always
    /// qualify; a bad request does unless it means the set does not exist,
    /// which no amount of retrying will change.
    pub fn is_retryable(&self) -> bool {
        match self {
            StickerApiError::RetryAfter(_) | StickerApiError::Network(_) => true,
            StickerApiError::BadRequest(_) => !self.is_set_missing(),
        }
    }
}

impl tess_core::Failure for StickerApiError {
    fn kind(&self) -> tess_core::FailureKind {
        if self.is_set_missing() {
            tess_core::FailureKind::RemoteContract
        } else {
            tess_core::FailureKind::TransportTransient
        }
    }
}

/// One sticker inside a remote set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSticker {
    pub file_id: String,
    pub custom_emoji_id: Option<String>,
}

/// A remote custom-emoji set as the service reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StickerSet {
    pub name: String,
    pub title: String,
    pub stickers: Vec<RemoteSticker>,
}

/// The five remote operations the pack client depends on. Implementations
/// must be safe to call concurrently.
#[async_trait]
pub trait StickerApi: Send + Sync + 'static {
    /// Upload one static sticker; returns the service file id.
    async fn upload_sticker_file(
        &self,
        user_id: UserId,
        png: Vec<u8>,
    ) -> Result<String, StickerApiError>;

    async fn get_sticker_set(&self, name: &str) -> Result<StickerSet, StickerApiError>;

    async fn add_sticker_to_set(
        &self,
        user_id: UserId,
        name: &str,
        file_id: &str,
    ) -> Result<(), StickerApiError>;

    async fn create_new_sticker_set(
        &self,
        user_id: UserId,
        name: &str,
        title: &str,
        file_ids: &[String],
    ) -> Result<(), StickerApiError>;
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
