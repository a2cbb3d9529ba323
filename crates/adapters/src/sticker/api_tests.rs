// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    with_underscore = { "STICKER_SET_INVALID" },
    without         = { "STICKERSET_INVALID" },
    lowercase       = { "stickerset_invalid" },
    embedded        = { "Bad Request: Sticker_Set_Invalid something" },
)]
fn set_missing_signals_are_recognized(message: &str) {
    let err = StickerApiError::BadRequest(message.to_string());
    assert!(err.is_set_missing());
    assert!(!err.is_retryable());
}

#[test]
fn other_bad_requests_are_retryable() {
    let err = StickerApiError::BadRequest("PEER_ID_INVALID".to_string());
    assert!(!err.is_set_missing());
    assert!(err.is_retryable());
}

#[test]
fn rate_limit_and_network_are_retryable_not_missing() {
    for err in [
        StickerApiError::RetryAfter(Duration::from_secs(3)),
        StickerApiError::Network("timed out".to_string()),
    ] {
        assert!(err.is_retryable());
        assert!(!err.is_set_missing());
    }
}
