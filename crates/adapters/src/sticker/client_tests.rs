// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::retry::RetryPolicy;
use crate::sticker::FakeStickerApi;
use chrono::{TimeZone, Utc};
use std::time::Duration;
use tess_core::{GridOption, PackRequest};

fn request_at_micros(micros: u32) -> PackRequest {
    PackRequest {
        user_id: 42,
        chat_id: 9,
        file_path: "/tmp/job/tmp_ab12cd.png".into(),
        image_hash: "feedface".to_string(),
        grid: GridOption { rows: 2, cols: 3 },
        padding: 2,
        file_unique_id: "AQADxyz".to_string(),
        requested_at: Utc.with_ymd_and_hms(2026, 7, 1, 12, 30, 45).unwrap()
            + chrono::Duration::microseconds(i64::from(micros)),
    }
}

fn client(api: FakeStickerApi) -> PackClient<FakeStickerApi> {
    PackClient::new(api, "TessBot", None, 50, 200).with_retry_policy(RetryPolicy {
        attempts: 3,
        initial_delay: Duration::from_millis(5),
        max_delay: Duration::from_millis(20),
        factor: 2.0,
    })
}

fn write_tiles(dir: &std::path::Path, count: usize) -> Vec<std::path::PathBuf> {
    (0..count)
        .map(|i| {
            let path = dir.join(format!("tile_{i}.png"));
            std::fs::write(&path, format!("png-bytes-{i}")).unwrap();
            path
        })
        .collect()
}

#[test]
fn short_name_is_well_formed() {
    let client = client(FakeStickerApi::new());
    let name = client.build_short_name(&request_at_micros(123456)).unwrap();
    assert!(name.len() <= 64, "{name:?} too long");
    assert!(name.ends_with("_by_tessbot"));
    assert!(name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
    assert!(name.contains("_42_"), "user id folded in: {name}");
    assert!(name.contains("2x3"));
    assert!(name.contains("_p2_"));
}

#[test]
fn short_name_differs_for_different_request_times() {
    let client = client(FakeStickerApi::new());
    let a = client.build_short_name(&request_at_micros(1)).unwrap();
    let b = client.build_short_name(&request_at_micros(2)).unwrap();
    assert_ne!(a, b, "same fingerprint at different instants must differ");
}

#[test]
fn short_name_uses_file_unique_id_when_stem_is_empty() {
    let client = client(FakeStickerApi::new());
    let mut request = request_at_micros(0);
    request.file_path = "/tmp/job/習字.習".into();
    let name = client.build_short_name(&request).unwrap();
    assert!(name.contains("aqadxy"), "platform id entropy expected: {name}");
}

#[tokio::test(start_paused = true)]
async fn fresh_submission_creates_a_set() {
    let api = FakeStickerApi::new();
    let client = client(api.clone());
    let dir = tempfile::tempdir().unwrap();
    let tiles = write_tiles(dir.path(), 6);
    let request = request_at_micros(0);

    let result = client.create_or_extend(&request, &tiles).await.unwrap();
    assert_eq!(result.custom_emoji_ids.len(), 6);
    assert_eq!(result.link, format!("https://t.me/addemoji/{}", result.short_name));
    assert_eq!(result.fragment_preview_id, None, "no preview host configured");
    assert_eq!(api.upload_count(), 6);
    assert!(api.set(&result.short_name).is_some());
}

#[tokio::test(start_paused = true)]
async fn existing_set_is_extended_and_new_ids_are_the_tail() {
    let api = FakeStickerApi::new();
    let client = client(api.clone());
    let dir = tempfile::tempdir().unwrap();
    let tiles = write_tiles(dir.path(), 2);
    let request = request_at_micros(0);
    let short_name = client.build_short_name(&request).unwrap();
    api.seed_set(&short_name, 3);

    let result = client.create_or_extend(&request, &tiles).await.unwrap();
    assert_eq!(result.custom_emoji_ids.len(), 2);
    let set = api.set(&short_name).unwrap();
    assert_eq!(set.stickers.len(), 5);
    let tail: Vec<String> =
        set.stickers[3..].iter().filter_map(|s| s.custom_emoji_id.clone()).collect();
    assert_eq!(result.custom_emoji_ids, tail);
}

#[tokio::test(start_paused = true)]
async fn over_quota_submission_is_rejected_before_upload() {
    let api = FakeStickerApi::new();
    let client = PackClient::new(api.clone(), "TessBot", None, 4, 200);
    let dir = tempfile::tempdir().unwrap();
    let tiles = write_tiles(dir.path(), 5);

    let err = client.create_or_extend(&request_at_micros(0), &tiles).await.unwrap_err();
    assert!(matches!(err, StickerClientError::TooManyTiles { count: 5, limit: 4 }));
    assert_eq!(api.upload_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn full_set_refuses_extension() {
    let api = FakeStickerApi::new();
    let client = PackClient::new(api.clone(), "TessBot", None, 50, 4);
    let dir = tempfile::tempdir().unwrap();
    let tiles = write_tiles(dir.path(), 2);
    let request = request_at_micros(0);
    let short_name = client.build_short_name(&request).unwrap();
    api.seed_set(&short_name, 3);

    let err = client.create_or_extend(&request, &tiles).await.unwrap_err();
    assert!(matches!(err, StickerClientError::SetFull { .. }));
}

#[tokio::test(start_paused = true)]
async fn transient_upload_failures_are_retried() {
    let api = FakeStickerApi::new();
    api.fail_next_uploads(vec![
        StickerApiError::Network("reset".to_string()),
        StickerApiError::RetryAfter(Duration::from_secs(1)),
    ]);
    let client = client(api.clone());
    let dir = tempfile::tempdir().unwrap();
    let tiles = write_tiles(dir.path(), 1);

    let result = client.create_or_extend(&request_at_micros(0), &tiles).await.unwrap();
    assert_eq!(result.custom_emoji_ids.len(), 1);
    assert_eq!(api.upload_count(), 1, "only the successful attempt lands");
}

#[tokio::test(start_paused = true)]
async fn exhausted_retries_surface_the_last_error() {
    let api = FakeStickerApi::new();
    api.fail_next_uploads(vec![
        StickerApiError::Network("a".to_string()),
        StickerApiError::Network("b".to_string()),
        StickerApiError::Network("c".to_string()),
    ]);
    let client = client(api.clone());
    let dir = tempfile::tempdir().unwrap();
    let tiles = write_tiles(dir.path(), 1);

    let err = client.create_or_extend(&request_at_micros(0), &tiles).await.unwrap_err();
    assert!(matches!(err, StickerClientError::Api(StickerApiError::Network(_))));
}

#[tokio::test(start_paused = true)]
async fn fragment_preview_id_is_first_new_tile_when_host_configured() {
    let api = FakeStickerApi::new();
    let client = PackClient::new(api.clone(), "TessBot", Some("fragment.com".to_string()), 50, 200);
    let dir = tempfile::tempdir().unwrap();
    let tiles = write_tiles(dir.path(), 3);

    let result = client.create_or_extend(&request_at_micros(0), &tiles).await.unwrap();
    assert_eq!(result.fragment_preview_id.as_ref(), result.custom_emoji_ids.first());
}
