// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schema creation, idempotent per statement

use crate::store::StoreError;
use rusqlite::Connection;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS user_settings (
        user_id INTEGER PRIMARY KEY,
        default_grid TEXT NOT NULL,
        default_padding INTEGER NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS emoji_jobs (
        user_id INTEGER NOT NULL,
        image_hash TEXT NOT NULL,
        grid TEXT NOT NULL,
        padding INTEGER NOT NULL,
        short_name TEXT NOT NULL,
        link TEXT NOT NULL,
        custom_emoji_ids TEXT NOT NULL,
        fragment_preview_id TEXT,
        created_at TEXT NOT NULL,
        PRIMARY KEY (user_id, image_hash, grid, padding)
    )",
    "CREATE TABLE IF NOT EXISTS usage_stats (
        user_id INTEGER PRIMARY KEY,
        username TEXT,
        display_name TEXT,
        total_count INTEGER NOT NULL,
        message_count INTEGER NOT NULL DEFAULT 0,
        first_seen TEXT NOT NULL,
        last_seen TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS tracking_links (
        link_id INTEGER PRIMARY KEY AUTOINCREMENT,
        tag TEXT NOT NULL,
        slug TEXT NOT NULL,
        created_at TEXT NOT NULL,
        deleted_at TEXT
    )",
    "CREATE TABLE IF NOT EXISTS tracking_events (
        event_id INTEGER PRIMARY KEY AUTOINCREMENT,
        link_id INTEGER NOT NULL,
        user_id INTEGER NOT NULL,
        kind TEXT NOT NULL,
        first_start INTEGER NOT NULL,
        created_at TEXT NOT NULL,
        FOREIGN KEY (link_id) REFERENCES tracking_links(link_id)
    )",
    // Slug uniqueness holds only over the active subset; soft delete frees
    // the slug for reuse.
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_tracking_links_slug
        ON tracking_links(slug)
        WHERE deleted_at IS NULL",
    "CREATE INDEX IF NOT EXISTS idx_tracking_links_deleted
        ON tracking_links(deleted_at)",
    "CREATE INDEX IF NOT EXISTS idx_tracking_events_link_id
        ON tracking_events(link_id)",
    "CREATE INDEX IF NOT EXISTS idx_tracking_events_link_user
        ON tracking_events(link_id, user_id)",
    "CREATE INDEX IF NOT EXISTS idx_tracking_events_created_at
        ON tracking_events(created_at)",
];

pub(crate) fn run(conn: &mut Connection) -> Result<(), StoreError> {
    let tx = conn.transaction()?;
    for statement in SCHEMA {
        tx.execute(statement, [])?;
    }
    tx.commit()?;
    Ok(())
}

#[cfg(test)]
#[path = "migration_tests.rs"]
mod tests;
