// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store handle and connection plumbing

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from durable-store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("stored value codec error: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("stored grid is malformed: {0}")]
    Grid(#[from] tess_core::GridError),

    #[error("stored timestamp is malformed: {0}")]
    Timestamp(#[from] chrono::ParseError),

    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl tess_core::Failure for StoreError {
    fn kind(&self) -> tess_core::FailureKind {
        tess_core::FailureKind::Io
    }
}

/// Handle to the single-file store. Cheap to clone; each operation opens
/// its own connection.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Open the store at `path`, creating the file and running migrations.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self { path: path.into() };
        store
            .call(|conn| {
                crate::migrations::run(conn)?;
                Ok(())
            })
            .await?;
        tracing::info!(path = %store.path.display(), "durable store ready");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `op` with a fresh connection on the blocking pool.
    pub(crate) async fn call<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = Connection::open(&path)?;
            conn.pragma_update(None, "foreign_keys", "ON")?;
            op(&mut conn)
        })
        .await?
    }
}

/// Canonical ISO-8601 UTC timestamp form used for every stored instant.
///
/// Fixed microsecond precision keeps the strings lexicographically
/// sortable, which the date-window queries rely on.
pub(crate) fn encode_ts(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn decode_ts(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
