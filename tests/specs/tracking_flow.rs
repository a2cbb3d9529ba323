// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracking ledger scenario: issue, start twice, aggregate

use tess_engine::payload::{decode_payload, encode_link_id};
use tess_engine::TrackingService;
use tess_storage::Store;

async fn service() -> (tempfile::TempDir, TrackingService) {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path().join("state.db")).await.unwrap();
    (dir, TrackingService::new(store, "t.me", "tessbot"))
}

#[tokio::test]
async fn ad_campaign_scenario() {
    let (_dir, tracking) = service().await;
    let (link, url) = tracking.create("Ad Campaign", None).await.unwrap();
    assert_eq!(link.slug, "ad-campaign");
    let payload = url.rsplit_once("start=").unwrap().1;

    assert_eq!(decode_payload(payload).unwrap(), link.link_id);

    let (hit, first) = tracking.handle_start(payload, 7).await.unwrap().unwrap();
    assert_eq!(hit.link_id, link.link_id);
    assert!(first);
    let (_, second) = tracking.handle_start(payload, 7).await.unwrap().unwrap();
    assert!(!second);

    let stats = tracking.stats(None, None, None, false).await.unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(
        (stats[0].total_events, stats[0].unique_users, stats[0].first_starts),
        (2, 1, 1)
    );
}

#[test]
fn payload_round_trip_and_salt_property() {
    for link_id in [0i64, 1, 511, 70_000, i64::from(u32::MAX) + 17] {
        let payload = encode_link_id(link_id).unwrap();
        assert!(payload.len() <= 64);
        assert_eq!(decode_payload(&payload).unwrap(), link_id);
    }
    assert_ne!(encode_link_id(12).unwrap(), encode_link_id(12).unwrap());
}
