// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::Store;
use chrono::{TimeZone, Utc};
use tess_core::{GridOption, JobOutcome, PackRequest, PackResult};

async fn fresh_store() -> (tempfile::TempDir, Store) {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path().join("state.db")).await.unwrap();
    (dir, store)
}

fn request(user_id: i64, hash: &str) -> PackRequest {
    PackRequest {
        user_id,
        chat_id: 100,
        file_path: "/tmp/job/src.png".into(),
        image_hash: hash.to_string(),
        grid: GridOption { rows: 2, cols: 2 },
        padding: 2,
        file_unique_id: "AQADf".to_string(),
        requested_at: Utc.with_ymd_and_hms(2026, 5, 1, 10, 0, 0).unwrap(),
    }
}

fn outcome(user_id: i64, hash: &str, short_name: &str) -> JobOutcome {
    JobOutcome {
        request: request(user_id, hash),
        result: PackResult {
            short_name: short_name.to_string(),
            link: format!("https://t.me/addemoji/{short_name}"),
            custom_emoji_ids: vec!["501".to_string(), "502".to_string()],
            fragment_preview_id: Some("501".to_string()),
        },
        created_at: Utc.with_ymd_and_hms(2026, 5, 1, 10, 0, 5).unwrap(),
    }
}

#[tokio::test]
async fn save_then_lookup_round_trips() {
    let (_dir, store) = fresh_store().await;
    let saved = outcome(1, "deadbeef", "pack_one_by_bot");
    store.save_job_outcome(saved.clone()).await.unwrap();
    let cached = store.get_cached_job(&saved.request).await.unwrap();
    assert_eq!(cached, Some(saved));
}

#[tokio::test]
async fn lookup_misses_on_different_fingerprint() {
    let (_dir, store) = fresh_store().await;
    store.save_job_outcome(outcome(1, "aaaa", "p_by_bot")).await.unwrap();
    assert_eq!(store.get_cached_job(&request(1, "bbbb")).await.unwrap(), None);
    assert_eq!(store.get_cached_job(&request(2, "aaaa")).await.unwrap(), None);
}

#[tokio::test]
async fn resubmission_overwrites_the_row() {
    let (_dir, store) = fresh_store().await;
    store.save_job_outcome(outcome(1, "cafe", "first_by_bot")).await.unwrap();
    store.save_job_outcome(outcome(1, "cafe", "second_by_bot")).await.unwrap();
    let cached = store.get_cached_job(&request(1, "cafe")).await.unwrap().unwrap();
    assert_eq!(cached.result.short_name, "second_by_bot");
}

#[tokio::test]
async fn emoji_id_order_is_preserved() {
    let (_dir, store) = fresh_store().await;
    let mut saved = outcome(3, "0123", "ordered_by_bot");
    saved.result.custom_emoji_ids =
        vec!["9".to_string(), "1".to_string(), "5".to_string()];
    store.save_job_outcome(saved.clone()).await.unwrap();
    let cached = store.get_cached_job(&saved.request).await.unwrap().unwrap();
    assert_eq!(cached.result.custom_emoji_ids, saved.result.custom_emoji_ids);
}
