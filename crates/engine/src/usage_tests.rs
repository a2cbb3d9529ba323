// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

async fn service(page_size: i64) -> (tempfile::TempDir, UsageStatsService) {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path().join("state.db")).await.unwrap();
    (dir, UsageStatsService::new(store, Some(page_size)))
}

#[tokio::test]
async fn empty_table_yields_one_empty_page() {
    let (_dir, usage) = service(10).await;
    let report = usage.page(1).await.unwrap();
    assert!(report.rows.is_empty());
    assert_eq!((report.page, report.pages), (1, 1));
}

#[tokio::test]
async fn record_then_page_shows_totals() {
    let (_dir, usage) = service(10).await;
    usage.record(1, Some("u".into()), None, true).await.unwrap();
    usage.record(1, None, None, false).await.unwrap();
    usage.record(2, None, None, true).await.unwrap();
    let report = usage.page(1).await.unwrap();
    assert_eq!(report.total_users, 2);
    assert_eq!(report.total_events, 3);
    assert_eq!(report.rows[0].user_id, 1);
    assert_eq!(report.rows[0].message_count, 1);
}

#[tokio::test]
async fn pages_split_by_page_size() {
    let (_dir, usage) = service(2).await;
    for user in 1..=5 {
        usage.record(user, None, None, false).await.unwrap();
    }
    let report = usage.page(2).await.unwrap();
    assert_eq!(report.pages, 3);
    assert_eq!(report.rows.len(), 2);
}

#[tokio::test]
async fn out_of_range_page_clamps_to_last() {
    let (_dir, usage) = service(2).await;
    for user in 1..=3 {
        usage.record(user, None, None, false).await.unwrap();
    }
    let report = usage.page(99).await.unwrap();
    assert_eq!(report.page, 2);
    assert_eq!(report.rows.len(), 1);
}

#[tokio::test]
async fn zeroth_page_reads_as_first() {
    let (_dir, usage) = service(10).await;
    usage.record(1, None, None, false).await.unwrap();
    let report = usage.page(0).await.unwrap();
    assert_eq!(report.page, 1);
    assert_eq!(report.rows.len(), 1);
}
