// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transport-facing surface
//!
//! The chat transport calls in here with raw bytes and identities; replies
//! are structured data (the transport owns all human-readable text). One
//! pending submission is parked per user between the image arriving and
//! the grid choice coming back.

use crate::gate::AdmissionGate;
use crate::job::{JobError, ProcessJob};
use crate::queue::{JobQueue, QueueError};
use crate::scratch::ScratchManager;
use crate::settings::{SettingsError, UserSettingsService};
use crate::tracking::{TrackingError, TrackingService};
use crate::usage::{UsageReport, UsageStatsService};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use tess_core::{
    ChatId, Clock, GridOption, JobOutcome, LinkStats, PackRequest, SystemClock, TrackingLink,
    UserId, UserSettings,
};
use tess_imaging::{image_hash, probe, suggest_grids};
use tess_storage::StoreError;
use tess_text::{PipelineOutput, StageRegistry};
use thiserror::Error;
use tokio::sync::oneshot;
use uuid::Uuid;

const MAX_PADDING: u8 = 5;

/// Future for a submitted job; resolves with the worker's outcome.
pub type JobHandle = oneshot::Receiver<Result<JobOutcome, JobError>>;

/// Errors surfaced to the transport
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("user has an in-flight submission or is cooling down")]
    Busy,

    #[error("unsupported image payload: {0}")]
    BadImage(#[from] tess_imaging::ImagingError),

    #[error("no pending submission for this user")]
    NoPendingSubmission,

    #[error("grid {0:?} is not available for this image")]
    UnknownGrid(String),

    #[error("padding level {0} is out of range (0..={MAX_PADDING})")]
    BadPadding(u8),

    #[error(transparent)]
    Grid(#[from] tess_core::GridError),

    #[error("user is not on the admin allow-list")]
    NotAuthorized,

    #[error("scratch write failed: {0}")]
    Scratch(#[from] std::io::Error),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Tracking(#[from] TrackingError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Queue(#[from] QueueError),
}

impl tess_core::Failure for GatewayError {
    fn kind(&self) -> tess_core::FailureKind {
        match self {
            GatewayError::Busy => tess_core::FailureKind::TransportTransient,
            GatewayError::BadImage(_)
            | GatewayError::NoPendingSubmission
            | GatewayError::UnknownGrid(_)
            | GatewayError::BadPadding(_)
            | GatewayError::Grid(_)
            | GatewayError::NotAuthorized => tess_core::FailureKind::InputInvalid,
            GatewayError::Scratch(_) => tess_core::FailureKind::Io,
            GatewayError::Settings(err) => tess_core::Failure::kind(err),
            GatewayError::Tracking(err) => tess_core::Failure::kind(err),
            GatewayError::Store(err) => tess_core::Failure::kind(err),
            GatewayError::Queue(_) => tess_core::FailureKind::Fatal,
        }
    }
}

/// Static limits and identity the gateway enforces.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub max_tiles: u32,
    pub creation_limit: u32,
    pub grid_tile_cap: Option<u32>,
    pub retention_minutes: u64,
    pub admin_user_ids: HashSet<UserId>,
}

struct PendingSubmission {
    bytes: Vec<u8>,
    image_hash: String,
    file_unique_id: String,
    extension: String,
    options: Vec<GridOption>,
}

/// Reply to an accepted image submission: the probed dimensions plus the
/// keyboard the transport should render, as `(label, callback_token)`
/// pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReply {
    pub width: u32,
    pub height: u32,
    pub options: Vec<(String, String)>,
    pub default_grid: GridOption,
    pub default_padding: u8,
    pub retention_minutes: u64,
}

pub struct Gateway<P: ProcessJob, C: Clock = SystemClock> {
    config: GatewayConfig,
    gate: AdmissionGate<C>,
    scratch: ScratchManager,
    queue: Arc<JobQueue<P>>,
    settings: UserSettingsService,
    usage: UsageStatsService,
    tracking: TrackingService,
    scrubber: StageRegistry,
    clock: C,
    pending: Mutex<HashMap<UserId, PendingSubmission>>,
}

impl<P: ProcessJob, C: Clock> Gateway<P, C> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: GatewayConfig,
        gate: AdmissionGate<C>,
        scratch: ScratchManager,
        queue: Arc<JobQueue<P>>,
        settings: UserSettingsService,
        usage: UsageStatsService,
        tracking: TrackingService,
        scrubber: StageRegistry,
        clock: C,
    ) -> Self {
        Self {
            config,
            gate,
            scratch,
            queue,
            settings,
            usage,
            tracking,
            scrubber,
            clock,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// An image arrived: admit, probe, plan, park the payload, and return
    /// the grid keyboard. The gate is held only for the duration of this
    /// call; acceptance of the eventual job restarts the cooldown via the
    /// completion path.
    pub async fn image_submission(
        &self,
        user_id: UserId,
        chat_id: ChatId,
        bytes: Vec<u8>,
        file_unique_id: &str,
        mime_hint: Option<&str>,
    ) -> Result<SubmissionReply, GatewayError> {
        if !self.gate.try_acquire(user_id) {
            return Err(GatewayError::Busy);
        }
        let reply =
            self.prepare_submission(user_id, chat_id, bytes, file_unique_id, mime_hint).await;
        self.gate.release(user_id);
        reply
    }

    async fn prepare_submission(
        &self,
        user_id: UserId,
        _chat_id: ChatId,
        bytes: Vec<u8>,
        file_unique_id: &str,
        mime_hint: Option<&str>,
    ) -> Result<SubmissionReply, GatewayError> {
        let hash = image_hash(&bytes);
        let (width, height) = probe(&bytes)?;
        let limit_tiles = self.config.max_tiles.min(self.config.creation_limit);
        let plan =
            suggest_grids(width, height, limit_tiles, None).capped(self.config.grid_tile_cap);

        let settings = self.settings.get(user_id).await?;
        let mut default_grid = settings.default_grid;
        if default_grid.tiles() > limit_tiles || !plan.contains(default_grid) {
            default_grid = plan.fallback;
        }

        let options: Vec<(String, String)> =
            plan.options.iter().map(|o| (o.label(), format!("grid:{}", o.encode()))).collect();
        self.pending.lock().insert(
            user_id,
            PendingSubmission {
                bytes,
                image_hash: hash,
                file_unique_id: file_unique_id.to_string(),
                extension: extension_from_hint(mime_hint),
                options: plan.options,
            },
        );
        self.usage.record(user_id, None, None, true).await?;

        tracing::debug!(user_id, width, height, "submission parked");
        Ok(SubmissionReply {
            width,
            height,
            options,
            default_grid,
            default_padding: settings.default_padding,
            retention_minutes: self.config.retention_minutes,
        })
    }

    /// The user picked a grid: persist the payload into a per-job scratch
    /// directory, enqueue, and hand back the job future. The gate opens
    /// again when the job settles, on every exit path.
    pub async fn selection(
        &self,
        user_id: UserId,
        chat_id: ChatId,
        grid_encoded: &str,
        padding_level: u8,
    ) -> Result<JobHandle, GatewayError> {
        let grid = GridOption::decode(grid_encoded)?;
        if padding_level > MAX_PADDING {
            return Err(GatewayError::BadPadding(padding_level));
        }
        let pending = {
            let mut pending_map = self.pending.lock();
            let parked =
                pending_map.get(&user_id).ok_or(GatewayError::NoPendingSubmission)?;
            if !parked.options.contains(&grid) {
                // Keep the parked submission; the user can pick again.
                return Err(GatewayError::UnknownGrid(grid_encoded.to_string()));
            }
            pending_map.remove(&user_id).ok_or(GatewayError::NoPendingSubmission)?
        };

        let job_token = Uuid::new_v4().simple().to_string();
        let hash_prefix = &pending.image_hash[..6.min(pending.image_hash.len())];
        let subdir =
            PathBuf::from(user_id.to_string()).join(format!("job_{hash_prefix}_{}", &job_token[..8]));
        let file_path =
            self.scratch.write_bytes(&pending.bytes, &pending.extension, Some(&subdir)).await?;

        let request = PackRequest {
            user_id,
            chat_id,
            file_path,
            image_hash: pending.image_hash,
            grid,
            padding: padding_level,
            file_unique_id: pending.file_unique_id,
            requested_at: self.clock.now_utc(),
        };

        // The chosen grid and padding become the user's defaults.
        self.settings.update(user_id, grid, padding_level).await?;

        let inner = match self.queue.submit(request) {
            Ok(inner) => inner,
            Err(err) => {
                self.gate.release(user_id);
                return Err(err.into());
            }
        };

        let gate = self.gate.clone();
        let (reply, handle) = oneshot::channel();
        tokio::spawn(async move {
            let result = match inner.await {
                Ok(result) => result,
                Err(_) => Err(JobError::WorkerGone),
            };
            gate.release(user_id);
            let _ = reply.send(result);
        });
        Ok(handle)
    }

    pub async fn settings(&self, user_id: UserId) -> Result<UserSettings, GatewayError> {
        Ok(self.settings.get(user_id).await?)
    }

    pub async fn set_padding(
        &self,
        user_id: UserId,
        level: u8,
    ) -> Result<UserSettings, GatewayError> {
        if level > MAX_PADDING {
            return Err(GatewayError::BadPadding(level));
        }
        let current = self.settings.get(user_id).await?;
        Ok(self.settings.update(user_id, current.default_grid, level).await?)
    }

    pub async fn set_default_grid(
        &self,
        user_id: UserId,
        grid_encoded: &str,
    ) -> Result<UserSettings, GatewayError> {
        let grid = GridOption::decode(grid_encoded)?;
        let current = self.settings.get(user_id).await?;
        Ok(self.settings.update(user_id, grid, current.default_padding).await?)
    }

    /// Run the text scrubber over a message.
    pub async fn scrub_text(
        &self,
        user_id: UserId,
        text: &str,
    ) -> Result<PipelineOutput, GatewayError> {
        let output = self.scrubber.default_pipeline().run(text);
        self.usage.record(user_id, None, None, true).await?;
        Ok(output)
    }

    /// A /start deep link arrived.
    pub async fn handle_start(
        &self,
        user_id: UserId,
        payload: &str,
    ) -> Result<Option<(TrackingLink, bool)>, GatewayError> {
        let hit = self.tracking.handle_start(payload, user_id).await?;
        self.usage.record(user_id, None, None, false).await?;
        Ok(hit)
    }

    pub fn is_admin(&self, user_id: UserId) -> bool {
        self.config.admin_user_ids.contains(&user_id)
    }

    pub async fn usage_report(
        &self,
        admin: UserId,
        page: i64,
    ) -> Result<UsageReport, GatewayError> {
        self.require_admin(admin)?;
        Ok(self.usage.page(page).await?)
    }

    pub async fn tracking_create(
        &self,
        admin: UserId,
        tag: &str,
        slug: Option<&str>,
    ) -> Result<(TrackingLink, String), GatewayError> {
        self.require_admin(admin)?;
        Ok(self.tracking.create(tag, slug).await?)
    }

    pub async fn tracking_list(&self, admin: UserId) -> Result<Vec<TrackingLink>, GatewayError> {
        self.require_admin(admin)?;
        Ok(self.tracking.list_links().await?)
    }

    pub async fn tracking_delete(&self, admin: UserId, link_id: i64) -> Result<bool, GatewayError> {
        self.require_admin(admin)?;
        Ok(self.tracking.delete(link_id).await?)
    }

    pub async fn tracking_stats(
        &self,
        admin: UserId,
        daily: bool,
    ) -> Result<Vec<LinkStats>, GatewayError> {
        self.require_admin(admin)?;
        Ok(self.tracking.stats(None, None, None, daily).await?)
    }

    fn require_admin(&self, user_id: UserId) -> Result<(), GatewayError> {
        if self.is_admin(user_id) {
            Ok(())
        } else {
            Err(GatewayError::NotAuthorized)
        }
    }
}

fn extension_from_hint(mime_hint: Option<&str>) -> String {
    mime_hint
        .and_then(|hint| hint.split_once('/'))
        .map(|(_, sub)| sub.to_ascii_lowercase())
        .filter(|sub| !sub.is_empty())
        .unwrap_or_else(|| "png".to_string())
}

#[cfg(test)]
#[path = "gateway_tests.rs"]
mod tests;
