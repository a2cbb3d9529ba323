// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scoped scratch files with TTL sweeping

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::task::JoinHandle;
use uuid::Uuid;

const SWEEP_PERIOD: Duration = Duration::from_secs(60);

struct Inner {
    base: PathBuf,
    retention: Duration,
    // Serializes sweep passes so write and sweep never race on one entry.
    sweep_gate: tokio::sync::Mutex<()>,
    sweeper: parking_lot::Mutex<Option<JoinHandle<()>>>,
}

/// Owns a scratch directory tree and ages out stale entries.
///
/// Writers get fresh `tmp_<hex>` names so concurrent writes never collide.
/// The sweeper looks only at top-level entries: a nested file survives
/// until its parent directory itself ages out.
#[derive(Clone)]
pub struct ScratchManager {
    inner: Arc<Inner>,
}

impl ScratchManager {
    /// Create the manager and its base directory.
    pub fn new(base: impl Into<PathBuf>, retention: Duration) -> std::io::Result<Self> {
        let base = base.into();
        std::fs::create_dir_all(&base)?;
        Ok(Self {
            inner: Arc::new(Inner {
                base,
                retention,
                sweep_gate: tokio::sync::Mutex::new(()),
                sweeper: parking_lot::Mutex::new(None),
            }),
        })
    }

    pub fn base(&self) -> &Path {
        &self.inner.base
    }

    /// Write `data` to a fresh `tmp_<hex><suffix>` file under
    /// `base/subdir`, creating the subdirectory as needed.
    pub async fn write_bytes(
        &self,
        data: &[u8],
        suffix: &str,
        subdir: Option<&Path>,
    ) -> std::io::Result<PathBuf> {
        let suffix = if suffix.starts_with('.') {
            suffix.to_string()
        } else {
            format!(".{suffix}")
        };
        let dir = match subdir {
            Some(sub) => self.inner.base.join(sub),
            None => self.inner.base.clone(),
        };
        tokio::fs::create_dir_all(&dir).await?;
        let path = dir.join(format!("tmp_{}{suffix}", Uuid::new_v4().simple()));
        tokio::fs::write(&path, data).await?;
        Ok(path)
    }

    /// Launch the periodic sweeper. Idempotent while one is running.
    pub fn start(&self) {
        let mut sweeper = self.inner.sweeper.lock();
        if sweeper.is_some() {
            return;
        }
        let manager = self.clone();
        *sweeper = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(SWEEP_PERIOD);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = manager.sweep().await;
                if removed > 0 {
                    tracing::debug!(removed, "scratch sweep");
                }
            }
        }));
    }

    /// Cancel the sweeper and wait for it to finish. Idempotent.
    pub async fn stop(&self) {
        let handle = self.inner.sweeper.lock().take();
        if let Some(handle) = handle {
            handle.abort();
            let _ = handle.await;
        }
    }

    /// One sweep pass: remove top-level entries older than the retention
    /// cutoff. Directories go recursively; files only when they carry the
    /// `tmp_` prefix. Individual failures are logged and skipped.
    pub async fn sweep(&self) -> usize {
        let _gate = self.inner.sweep_gate.lock().await;
        let cutoff = SystemTime::now() - self.inner.retention;
        let mut removed = 0usize;

        let mut entries = match tokio::fs::read_dir(&self.inner.base).await {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(error = %err, "scratch scan failed");
                return 0;
            }
        };
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(err) => {
                    tracing::warn!(error = %err, "scratch scan aborted");
                    break;
                }
            };
            let path = entry.path();
            let metadata = match entry.metadata().await {
                Ok(metadata) => metadata,
                // Entry vanished between scan and stat.
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "stat failed");
                    continue;
                }
            };
            let Ok(modified) = metadata.modified() else { continue };
            if modified >= cutoff {
                continue;
            }

            let result = if metadata.is_dir() {
                tokio::fs::remove_dir_all(&path).await
            } else if entry.file_name().to_string_lossy().starts_with("tmp_") {
                tokio::fs::remove_file(&path).await
            } else {
                continue;
            };
            match result {
                Ok(()) => removed += 1,
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "scratch removal failed");
                }
            }
        }
        removed
    }
}

#[cfg(test)]
#[path = "scratch_tests.rs"]
mod tests;
