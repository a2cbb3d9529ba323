// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One-shot job processing: slice, assemble, persist, clean

use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tess_adapters::{PackClient, StickerApi, StickerClientError};
use tess_core::{JobOutcome, PackRequest, PackResult};
use tess_imaging::ImagingError;
use tess_storage::{Store, StoreError};
use thiserror::Error;

/// Errors a job future can resolve with
#[derive(Debug, Error)]
pub enum JobError {
    #[error("job file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Slice(#[from] ImagingError),

    #[error(transparent)]
    Client(#[from] StickerClientError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("worker dropped the job")]
    WorkerGone,
}

impl tess_core::Failure for JobError {
    fn kind(&self) -> tess_core::FailureKind {
        match self {
            JobError::Io(_) => tess_core::FailureKind::Io,
            JobError::Slice(err) => tess_core::Failure::kind(err),
            JobError::Client(err) => tess_core::Failure::kind(err),
            JobError::Store(err) => tess_core::Failure::kind(err),
            JobError::Join(_) | JobError::WorkerGone => tess_core::FailureKind::Fatal,
        }
    }
}

/// Processes one queued request to completion. The queue's workers only
/// see this interface; tests swap in fakes.
#[async_trait]
pub trait ProcessJob: Send + Sync + 'static {
    async fn process(&self, request: PackRequest) -> Result<JobOutcome, JobError>;
}

/// The production processor: slices tiles next to the source file, hands
/// them to the sticker client, records the outcome, and always cleans the
/// job directory up.
pub struct EmojiJobService<A> {
    store: Store,
    client: PackClient<A>,
    scratch_root: PathBuf,
    tile_size: u32,
}

impl<A: StickerApi> EmojiJobService<A> {
    pub fn new(store: Store, client: PackClient<A>, scratch_root: PathBuf, tile_size: u32) -> Self {
        Self { store, client, scratch_root, tile_size }
    }

    async fn slice_and_assemble(
        &self,
        request: &PackRequest,
        job_dir: &Path,
        tile_paths: &mut Vec<PathBuf>,
    ) -> Result<PackResult, JobError> {
        let bytes = tokio::fs::read(&request.file_path).await?;
        let stem = request
            .file_path
            .file_stem()
            .map_or_else(|| "tile".to_string(), |s| s.to_string_lossy().to_string());

        let grid = request.grid;
        let padding = request.padding;
        let tile_size = self.tile_size;
        let tiles =
            tokio::task::spawn_blocking(move || tess_imaging::slice(&bytes, grid, padding, tile_size))
                .await??;

        for tile in &tiles {
            let path = job_dir.join(format!("{stem}_{}_{}.png", tile.row, tile.col));
            tokio::fs::write(&path, &tile.png).await?;
            tile_paths.push(path);
        }

        Ok(self.client.create_or_extend(request, tile_paths).await?)
    }

    /// Unlink tiles and the source, then drop the job directory when it is
    /// not the scratch root itself. Never fails; failures are logged so
    /// they cannot mask the job's own error.
    async fn cleanup(&self, source: &Path, tile_paths: &[PathBuf], job_dir: &Path) {
        let source = source.to_path_buf();
        for path in tile_paths.iter().chain(std::iter::once(&source)) {
            if let Err(err) = tokio::fs::remove_file(path).await {
                if err.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %path.display(), error = %err, "tile unlink failed");
                }
            }
        }
        if job_dir != self.scratch_root {
            if let Err(err) = tokio::fs::remove_dir_all(job_dir).await {
                if err.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(dir = %job_dir.display(), error = %err,
                        "job directory removal failed");
                }
            }
        }
    }
}

#[async_trait]
impl<A: StickerApi> ProcessJob for EmojiJobService<A> {
    async fn process(&self, request: PackRequest) -> Result<JobOutcome, JobError> {
        let job_dir = request
            .file_path
            .parent()
            .map_or_else(|| self.scratch_root.clone(), Path::to_path_buf);
        let mut tile_paths = Vec::new();

        let result = self.slice_and_assemble(&request, &job_dir, &mut tile_paths).await;
        self.cleanup(&request.file_path, &tile_paths, &job_dir).await;
        let result = result?;

        tracing::info!(user_id = request.user_id, set = %result.short_name, "job complete");
        let outcome = JobOutcome { request, result, created_at: Utc::now() };
        self.store.save_job_outcome(outcome.clone()).await?;
        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
