// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    start = { EventKind::Start, "start" },
    visit = { EventKind::Visit, "visit" },
)]
fn kind_round_trips(kind: EventKind, wire: &str) {
    assert_eq!(kind.as_str(), wire);
    assert_eq!(EventKind::parse(wire), Some(kind));
}

#[test]
fn kind_parse_rejects_unknown() {
    assert_eq!(EventKind::parse("click"), None);
    assert_eq!(EventKind::parse("START"), None);
}

#[test]
fn deleted_flag_follows_timestamp() {
    let mut link = TrackingLink {
        link_id: 1,
        tag: "Ad".to_string(),
        slug: "ad".to_string(),
        created_at: Utc::now(),
        deleted_at: None,
    };
    assert!(!link.is_deleted());
    link.deleted_at = Some(Utc::now());
    assert!(link.is_deleted());
}
