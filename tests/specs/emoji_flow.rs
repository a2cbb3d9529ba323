// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Full image-to-pack flow through the wired container

use std::collections::HashMap;
use tess_adapters::FakeStickerApi;
use tess_daemon::{Config, Container};

fn solid_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 80, 0, 255]));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

fn config(dir: &std::path::Path) -> Config {
    let pairs: HashMap<String, String> = [
        ("BOT_NAME", "tessbot"),
        ("EMOJI_QUEUE_WORKERS", "2"),
        ("EMOJI_TILE_SIZE", "100"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    let mut config = Config::from_lookup(move |key| pairs.get(key).cloned()).unwrap();
    config.storage_path = dir.join("data/state.db");
    config.temp_dir = dir.join("data/tmp");
    config
}

#[tokio::test]
async fn submission_to_installed_pack() {
    let dir = tempfile::tempdir().unwrap();
    let api = FakeStickerApi::new();
    let container = Container::start(&config(dir.path()), api.clone()).await.unwrap();

    let reply = container
        .gateway
        .image_submission(42, 7, solid_png(200, 100), "AQADabc", Some("image/png"))
        .await
        .unwrap();
    assert_eq!((reply.width, reply.height), (200, 100));

    let handle = container
        .gateway
        .selection(42, 7, &reply.default_grid.encode(), reply.default_padding)
        .await
        .unwrap();
    let outcome = handle.await.unwrap().unwrap();

    assert_eq!(outcome.result.custom_emoji_ids.len() as u32, reply.default_grid.tiles());
    assert!(outcome.result.short_name.ends_with("_by_tessbot"));
    assert!(outcome.result.short_name.len() <= 64);
    assert_eq!(
        outcome.result.link,
        format!("https://t.me/addemoji/{}", outcome.result.short_name)
    );
    assert!(api.set(&outcome.result.short_name).is_some());

    // The scratch tree no longer holds the job directory.
    let job_root = container.scratch.base().join("42");
    assert!(!job_root.exists() || std::fs::read_dir(&job_root).unwrap().next().is_none());

    container.shutdown().await;
}

#[tokio::test]
async fn repeat_submission_gets_a_fresh_pack_name() {
    let dir = tempfile::tempdir().unwrap();
    let api = FakeStickerApi::new();
    let container = Container::start(&config(dir.path()), api.clone()).await.unwrap();
    let bytes = solid_png(100, 100);

    let mut names = Vec::new();
    for _ in 0..2 {
        // Same user, same bytes, same grid and padding; only requested_at
        // differs between the two runs.
        let reply = container
            .gateway
            .image_submission(42, 7, bytes.clone(), "AQADabc", Some("image/png"))
            .await
            .unwrap();
        let handle = container
            .gateway
            .selection(42, 7, &reply.default_grid.encode(), reply.default_padding)
            .await
            .unwrap();
        let outcome = handle.await.unwrap().unwrap();
        names.push(outcome.result.short_name);
        // Wait out the admission cooldown before the second round.
        tokio::time::sleep(std::time::Duration::from_millis(2100)).await;
    }

    assert_ne!(names[0], names[1], "identical fingerprints must still get fresh names");
    container.shutdown().await;
}
