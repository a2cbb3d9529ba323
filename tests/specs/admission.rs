// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Admission-gate timing spec

use std::time::Duration;
use tess_core::FakeClock;
use tess_engine::AdmissionGate;

/// t=0 acquire → true; t=0.5 → false; release at t=1.0; t=1.5 → false
/// (the cooldown restarted, and the rejection restamps it); t=3.5 → true.
#[test]
fn cooldown_timeline() {
    let clock = FakeClock::new();
    let gate = AdmissionGate::with_clock(Some(Duration::from_secs(2)), clock.clone());

    assert!(gate.try_acquire(42));
    clock.advance(Duration::from_millis(500));
    assert!(!gate.try_acquire(42));
    clock.advance(Duration::from_millis(500));
    gate.release(42);
    clock.advance(Duration::from_millis(500));
    assert!(!gate.try_acquire(42));
    clock.advance(Duration::from_secs(2));
    assert!(gate.try_acquire(42));
}
