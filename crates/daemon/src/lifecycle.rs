// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Container wiring: build components, start them, tear them down in order

use crate::env::Config;
use std::sync::Arc;
use std::time::Duration;
use tess_adapters::{PackClient, StickerApi};
use tess_core::SystemClock;
use tess_engine::{
    AdmissionGate, EmojiJobService, Gateway, GatewayConfig, JobQueue, ScratchManager,
    TrackingService, UsageStatsService, UserSettingsService,
};
use tess_storage::{Store, StoreError};
use tess_text::StageRegistry;
use thiserror::Error;

/// Host name carrying install and start links for the sticker platform.
const BOT_HOST: &str = "t.me";

/// Errors from container startup
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("failed to prepare data directories: {0}")]
    Io(#[from] std::io::Error),

    #[error("durable store failed to open: {0}")]
    Store(#[from] StoreError),
}

impl tess_core::Failure for LifecycleError {
    fn kind(&self) -> tess_core::FailureKind {
        tess_core::FailureKind::Fatal
    }
}

/// The wired system. Owns every long-lived component; `shutdown` is
/// idempotent and stops them in reverse dependency order.
pub struct Container<A: StickerApi> {
    pub store: Store,
    pub scratch: ScratchManager,
    pub queue: Arc<JobQueue<EmojiJobService<A>>>,
    pub gateway: Arc<Gateway<EmojiJobService<A>, SystemClock>>,
    stopped: parking_lot::Mutex<bool>,
}

impl<A: StickerApi + Clone> Container<A> {
    /// Create directories, open the store (running migrations), start the
    /// scratch sweeper, and start the queue workers.
    pub async fn start(config: &Config, api: A) -> Result<Self, LifecycleError> {
        if let Some(parent) = config.storage_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let store = Store::open(config.storage_path.clone()).await?;

        let scratch = ScratchManager::new(
            config.temp_dir.clone(),
            Duration::from_secs(config.temp_retention_minutes * 60),
        )?;
        scratch.start();

        let client = PackClient::new(
            api,
            config.bot_name.clone(),
            config.fragment_host.clone(),
            config.emoji_creation_limit as usize,
            config.emoji_max_tiles as usize,
        );
        let service = EmojiJobService::new(
            store.clone(),
            client,
            scratch.base().to_path_buf(),
            config.emoji_tile_size,
        );
        let queue = Arc::new(JobQueue::new(service, Some(config.emoji_queue_workers)));
        queue.start();

        let settings = UserSettingsService::new(
            store.clone(),
            config.emoji_grid_default,
            config.emoji_padding_default,
            config.grid_limit(),
        );
        let usage = UsageStatsService::new(store.clone(), None);
        let tracking = TrackingService::new(store.clone(), BOT_HOST, config.bot_name.clone());

        let gateway = Arc::new(Gateway::new(
            GatewayConfig {
                max_tiles: config.emoji_max_tiles,
                creation_limit: config.emoji_creation_limit,
                grid_tile_cap: config.emoji_grid_tile_cap,
                retention_minutes: config.temp_retention_minutes,
                admin_user_ids: config.admin_user_ids.clone(),
            },
            AdmissionGate::new(None),
            scratch.clone(),
            Arc::clone(&queue),
            settings,
            usage,
            tracking,
            StageRegistry::with_builtins(),
            SystemClock,
        ));

        tracing::info!(
            workers = config.emoji_queue_workers,
            tile_size = config.emoji_tile_size,
            "container started"
        );
        Ok(Self { store, scratch, queue, gateway, stopped: parking_lot::Mutex::new(false) })
    }

    /// Stop the queue (draining in-flight jobs), then the sweeper. The
    /// store needs no explicit close: connections are per-operation.
    pub async fn shutdown(&self) {
        {
            let mut stopped = self.stopped.lock();
            if *stopped {
                return;
            }
            *stopped = true;
        }
        tracing::info!("shutting down");
        self.queue.stop().await;
        self.scratch.stop().await;
        tracing::info!("shutdown complete");
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
