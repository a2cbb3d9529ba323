// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! tessd: run the container until interrupted

use tess_daemon::{Config, Container, OfflineStickerApi};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    std::process::exit(run().await);
}

async fn run() -> i32 {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("tessd: {err}");
            return 2;
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.directive()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let container = match Container::start(&config, OfflineStickerApi::new()).await {
        Ok(container) => container,
        Err(err) => {
            tracing::error!(error = %err, "startup failed");
            return 1;
        }
    };

    tracing::info!(bot = %config.bot_name, "tessd running; ctrl-c to stop");
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "signal listener failed, shutting down");
    }

    container.shutdown().await;
    0
}
