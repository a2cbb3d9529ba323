// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pack request/result records flowing through the job pipeline

use crate::grid::GridOption;
use crate::{ChatId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One accepted image submission, immutable once enqueued.
///
/// `image_hash` fingerprints the raw source bytes; together with
/// `(user_id, grid, padding)` it forms the job cache key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackRequest {
    pub user_id: UserId,
    pub chat_id: ChatId,
    pub file_path: PathBuf,
    pub image_hash: String,
    pub grid: GridOption,
    pub padding: u8,
    pub file_unique_id: String,
    pub requested_at: DateTime<Utc>,
}

/// Outcome of assembling a pack on the sticker service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackResult {
    /// Pack identifier on the remote service, `..._by_<bot_name>`.
    pub short_name: String,
    /// Canonical install URL.
    pub link: String,
    /// Tile identifiers in upload order.
    pub custom_emoji_ids: Vec<String>,
    /// First new tile id, present when a preview host is configured.
    pub fragment_preview_id: Option<String>,
}

/// A completed job, persisted under the cache fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOutcome {
    pub request: PackRequest,
    pub result: PackResult,
    pub created_at: DateTime<Utc>,
}

/// Per-user slicing defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    pub user_id: UserId,
    pub default_grid: GridOption,
    pub default_padding: u8,
}
