// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! usage_stats table: upsert-and-increment per-user counters

use crate::store::{encode_ts, Store, StoreError};
use chrono::Utc;
use rusqlite::params;
use tess_core::UserId;

/// One usage_stats row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageRow {
    pub user_id: UserId,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub total_count: i64,
    pub message_count: i64,
}

/// One page of usage rows plus table-wide totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsagePage {
    pub rows: Vec<UsageRow>,
    pub total_users: i64,
    pub total_events: i64,
}

impl Store {
    /// Count one user touch; `is_message` also bumps the message counter.
    ///
    /// Empty or whitespace names never clobber previously stored ones.
    pub async fn increment_usage(
        &self,
        user_id: UserId,
        username: Option<String>,
        display_name: Option<String>,
        is_message: bool,
    ) -> Result<(), StoreError> {
        let username = normalize(username);
        let display_name = normalize(display_name);
        self.call(move |conn| {
            let now = encode_ts(Utc::now());
            let message_inc: i64 = i64::from(is_message);
            conn.execute(
                "INSERT INTO usage_stats
                     (user_id, username, display_name, total_count, message_count,
                      first_seen, last_seen)
                 VALUES (?1, ?2, ?3, 1, ?4, ?5, ?5)
                 ON CONFLICT(user_id) DO UPDATE SET
                     total_count = usage_stats.total_count + 1,
                     message_count = usage_stats.message_count + ?4,
                     username = CASE
                         WHEN excluded.username IS NOT NULL AND excluded.username != ''
                             THEN excluded.username
                         ELSE usage_stats.username
                     END,
                     display_name = CASE
                         WHEN excluded.display_name IS NOT NULL AND excluded.display_name != ''
                             THEN excluded.display_name
                         ELSE usage_stats.display_name
                     END,
                     last_seen = excluded.last_seen",
                params![user_id, username, display_name, message_inc, now],
            )?;
            Ok(())
        })
        .await
    }

    /// Page of users ordered by total activity, with table-wide totals.
    pub async fn usage_page(&self, offset: i64, limit: i64) -> Result<UsagePage, StoreError> {
        self.call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT user_id, username, display_name, total_count, message_count
                 FROM usage_stats
                 ORDER BY total_count DESC, last_seen DESC
                 LIMIT ?1 OFFSET ?2",
            )?;
            let rows = stmt
                .query_map(params![limit, offset], |row| {
                    Ok(UsageRow {
                        user_id: row.get(0)?,
                        username: row.get(1)?,
                        display_name: row.get(2)?,
                        total_count: row.get(3)?,
                        message_count: row.get(4)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            let (total_users, total_events) = conn.query_row(
                "SELECT COUNT(*), COALESCE(SUM(total_count), 0) FROM usage_stats",
                [],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
            )?;
            Ok(UsagePage { rows, total_users, total_events })
        })
        .await
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "usage_tests.rs"]
mod tests;
