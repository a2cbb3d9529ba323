// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! user_settings table operations

use crate::store::{encode_ts, Store, StoreError};
use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use tess_core::{GridOption, UserId, UserSettings};

impl Store {
    pub async fn get_user_settings(
        &self,
        user_id: UserId,
    ) -> Result<Option<UserSettings>, StoreError> {
        self.call(move |conn| {
            let row = conn
                .query_row(
                    "SELECT default_grid, default_padding FROM user_settings WHERE user_id = ?1",
                    params![user_id],
                    |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
                )
                .optional()?;
            match row {
                None => Ok(None),
                Some((grid, padding)) => {
                    let default_grid = GridOption::decode(&grid)?;
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let default_padding = padding.clamp(0, i64::from(u8::MAX)) as u8;
                    Ok(Some(UserSettings { user_id, default_grid, default_padding }))
                }
            }
        })
        .await
    }

    pub async fn upsert_user_settings(&self, settings: UserSettings) -> Result<(), StoreError> {
        self.call(move |conn| {
            conn.execute(
                "INSERT INTO user_settings (user_id, default_grid, default_padding, updated_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(user_id) DO UPDATE SET
                     default_grid = excluded.default_grid,
                     default_padding = excluded.default_padding,
                     updated_at = excluded.updated_at",
                params![
                    settings.user_id,
                    settings.default_grid.encode(),
                    i64::from(settings.default_padding),
                    encode_ts(Utc::now()),
                ],
            )?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
