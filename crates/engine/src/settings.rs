// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-settings service: defaults, validation, sanitize-on-read

use tess_core::{GridOption, UserId, UserSettings};
use tess_storage::{Store, StoreError};
use thiserror::Error;

/// Errors from settings reads/updates
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("grid {} needs {tiles} tiles, over the limit of {limit}", .grid.encode())]
    LimitExceeded { grid: GridOption, tiles: u32, limit: u32 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl tess_core::Failure for SettingsError {
    fn kind(&self) -> tess_core::FailureKind {
        match self {
            SettingsError::LimitExceeded { .. } => tess_core::FailureKind::InputInvalid,
            SettingsError::Store(err) => tess_core::Failure::kind(err),
        }
    }
}

/// Per-user slicing defaults over the durable store.
#[derive(Clone)]
pub struct UserSettingsService {
    store: Store,
    default_grid: GridOption,
    default_padding: u8,
    grid_limit: u32,
}

impl UserSettingsService {
    pub fn new(store: Store, default_grid: GridOption, default_padding: u8, grid_limit: u32) -> Self {
        Self { store, default_grid, default_padding, grid_limit }
    }

    pub fn grid_limit(&self) -> u32 {
        self.grid_limit
    }

    /// Stored settings, repaired on read when the persisted grid violates
    /// the tile limit: the repair is written back before returning so the
    /// bad value is gone after one read.
    pub async fn get(&self, user_id: UserId) -> Result<UserSettings, SettingsError> {
        match self.store.get_user_settings(user_id).await? {
            Some(stored) if stored.default_grid.tiles() <= self.grid_limit => Ok(stored),
            Some(stored) => {
                let repaired = UserSettings {
                    user_id,
                    default_grid: self.fallback_grid(),
                    default_padding: stored.default_padding,
                };
                tracing::info!(user_id, stored = %stored.default_grid,
                    repaired = %repaired.default_grid, "sanitized stored grid");
                self.store.upsert_user_settings(repaired).await?;
                Ok(repaired)
            }
            None => Ok(UserSettings {
                user_id,
                default_grid: self.fallback_grid(),
                default_padding: self.default_padding,
            }),
        }
    }

    pub async fn update(
        &self,
        user_id: UserId,
        grid: GridOption,
        padding: u8,
    ) -> Result<UserSettings, SettingsError> {
        if grid.tiles() > self.grid_limit {
            return Err(SettingsError::LimitExceeded {
                grid,
                tiles: grid.tiles(),
                limit: self.grid_limit,
            });
        }
        let settings = UserSettings { user_id, default_grid: grid, default_padding: padding };
        self.store.upsert_user_settings(settings).await?;
        Ok(settings)
    }

    fn fallback_grid(&self) -> GridOption {
        if self.default_grid.tiles() <= self.grid_limit {
            self.default_grid
        } else {
            GridOption::FALLBACK
        }
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
