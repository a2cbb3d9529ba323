// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pack client: naming, upload, create-or-extend, quota

use super::api::{StickerApi, StickerApiError, StickerSet};
use crate::retry::{retry, RetryPolicy};
use std::path::{Path, PathBuf};
use tess_core::{PackRequest, PackResult};
use thiserror::Error;

/// Errors from pack assembly
#[derive(Debug, Error)]
pub enum StickerClientError {
    #[error("submission has {count} tiles, more than the per-run limit of {limit}")]
    TooManyTiles { count: usize, limit: usize },

    #[error("set {name} would exceed the total limit of {limit} stickers")]
    SetFull { name: String, limit: usize },

    #[error("bot name leaves no room for a short name")]
    BotNameTooLong,

    #[error("tile read failed: {0}")]
    TileRead(#[from] std::io::Error),

    #[error(transparent)]
    Api(#[from] StickerApiError),
}

impl tess_core::Failure for StickerClientError {
    fn kind(&self) -> tess_core::FailureKind {
        match self {
            StickerClientError::TooManyTiles { .. } => tess_core::FailureKind::InputInvalid,
            StickerClientError::SetFull { .. } | StickerClientError::BotNameTooLong => {
                tess_core::FailureKind::RemoteContract
            }
            StickerClientError::TileRead(_) => tess_core::FailureKind::Io,
            StickerClientError::Api(err) => tess_core::Failure::kind(err),
        }
    }
}

/// Assembles custom-emoji packs over a [`StickerApi`]. Stateless after
/// construction; concurrent calls are fine.
#[derive(Debug, Clone)]
pub struct PackClient<A> {
    api: A,
    bot_name: String,
    fragment_host: Option<String>,
    creation_limit: usize,
    total_limit: usize,
    policy: RetryPolicy,
}

impl<A: StickerApi> PackClient<A> {
    pub fn new(
        api: A,
        bot_name: impl Into<String>,
        fragment_host: Option<String>,
        creation_limit: usize,
        total_limit: usize,
    ) -> Self {
        Self {
            api,
            bot_name: bot_name.into(),
            fragment_host,
            creation_limit,
            total_limit,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Derive the pack short name for a request.
    ///
    /// `sanitize(base) + "_by_" + bot`, where the base folds in user id,
    /// microsecond timestamp, grid, padding level, and a 6-char entropy
    /// token from the file stem (or the platform file id). The timestamp
    /// makes repeat submissions of the same fingerprint produce fresh
    /// names.
    pub fn build_short_name(&self, request: &PackRequest) -> Result<String, StickerClientError> {
        let suffix = format!("_by_{}", self.bot_name.to_lowercase());
        let timestamp = format!(
            "{}{:06}",
            request.requested_at.format("%Y%m%d%H%M%S"),
            request.requested_at.timestamp_subsec_micros() % 1_000_000,
        );
        let file_marker = entropy_token(
            request.file_path.file_stem().map(|s| s.to_string_lossy().to_string()),
        );
        let unique_marker = entropy_token(Some(request.file_unique_id.clone()));
        let entropy = [file_marker, unique_marker]
            .into_iter()
            .flatten()
            .next()
            .unwrap_or_else(|| "file".to_string());

        let base = format!(
            "emoji_{}_{}_{}x{}_p{}_{}",
            request.user_id, timestamp, request.grid.rows, request.grid.cols, request.padding,
            entropy,
        )
        .to_lowercase();
        let sanitized: String = base
            .chars()
            .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' { c } else { '_' })
            .collect();

        let max_base_len = 64usize
            .checked_sub(suffix.len())
            .filter(|n| *n > 0)
            .ok_or(StickerClientError::BotNameTooLong)?;
        let cut = sanitized.len().min(max_base_len);
        let trimmed = sanitized[..cut].trim_end_matches('_');
        let trimmed = if trimmed.is_empty() { "emoji" } else { trimmed };
        Ok(format!("{trimmed}{suffix}"))
    }

    /// Upload tiles and create the pack, or extend it when a set with this
    /// name already exists. Every remote call goes through the retry
    /// driver.
    pub async fn create_or_extend(
        &self,
        request: &PackRequest,
        tile_paths: &[PathBuf],
    ) -> Result<PackResult, StickerClientError> {
        if tile_paths.len() > self.creation_limit {
            return Err(StickerClientError::TooManyTiles {
                count: tile_paths.len(),
                limit: self.creation_limit,
            });
        }

        let short_name = self.build_short_name(request)?;
        let title = format!("Created by @{}", self.bot_name);

        let mut file_ids = Vec::with_capacity(tile_paths.len());
        for path in tile_paths {
            file_ids.push(self.upload_tile(request.user_id, path).await?);
        }

        let set = match self.get_set(&short_name).await {
            Ok(existing) => {
                if existing.stickers.len() + file_ids.len() > self.total_limit {
                    return Err(StickerClientError::SetFull {
                        name: short_name,
                        limit: self.total_limit,
                    });
                }
                for file_id in &file_ids {
                    retry(self.policy, StickerApiError::is_retryable, || {
                        self.api.add_sticker_to_set(request.user_id, &short_name, file_id)
                    })
                    .await?;
                }
                self.get_set(&short_name).await?
            }
            Err(err) if err.is_set_missing() => {
                tracing::debug!(set = %short_name, "set not found, creating");
                retry(self.policy, StickerApiError::is_retryable, || {
                    self.api.create_new_sticker_set(
                        request.user_id,
                        &short_name,
                        &title,
                        &file_ids,
                    )
                })
                .await?;
                self.get_set(&short_name).await?
            }
            Err(err) => return Err(err.into()),
        };

        let custom_ids: Vec<String> =
            set.stickers.iter().filter_map(|s| s.custom_emoji_id.clone()).collect();
        let new_ids: Vec<String> = if custom_ids.len() >= file_ids.len() {
            custom_ids[custom_ids.len() - file_ids.len()..].to_vec()
        } else {
            custom_ids
        };
        let fragment_preview_id = match (&self.fragment_host, new_ids.first()) {
            (Some(_), Some(first)) => Some(first.clone()),
            _ => None,
        };

        tracing::info!(set = %short_name, tiles = new_ids.len(), "pack assembled");
        Ok(PackResult {
            link: format!("https://t.me/addemoji/{short_name}"),
            short_name,
            custom_emoji_ids: new_ids,
            fragment_preview_id,
        })
    }

    async fn upload_tile(
        &self,
        user_id: tess_core::UserId,
        path: &Path,
    ) -> Result<String, StickerClientError> {
        let png = tokio::fs::read(path).await?;
        let file_id = retry(self.policy, StickerApiError::is_retryable, || {
            self.api.upload_sticker_file(user_id, png.clone())
        })
        .await?;
        Ok(file_id)
    }

    async fn get_set(&self, name: &str) -> Result<StickerSet, StickerApiError> {
        retry(self.policy, StickerApiError::is_retryable, || self.api.get_sticker_set(name)).await
    }
}

fn entropy_token(source: Option<String>) -> Option<String> {
    let token: String = source?
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .take(6)
        .collect();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
