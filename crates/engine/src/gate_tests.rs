// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tess_core::FakeClock;

fn gate(clock: &FakeClock) -> AdmissionGate<FakeClock> {
    AdmissionGate::with_clock(Some(Duration::from_secs(2)), clock.clone())
}

#[test]
fn first_acquire_succeeds() {
    let clock = FakeClock::new();
    assert!(gate(&clock).try_acquire(42));
}

#[test]
fn busy_user_is_rejected_until_release_and_cooldown() {
    // t=0 acquire, t=0.5 reject, release at t=1.0, t=1.5 still cooling
    // (release restarted the window), t=3.5 admitted again.
    let clock = FakeClock::new();
    let gate = gate(&clock);

    assert!(gate.try_acquire(42));
    clock.advance(Duration::from_millis(500));
    assert!(!gate.try_acquire(42));
    clock.advance(Duration::from_millis(500));
    gate.release(42);
    clock.advance(Duration::from_millis(500));
    assert!(!gate.try_acquire(42), "cooldown runs from release");
    clock.advance(Duration::from_secs(2));
    assert!(gate.try_acquire(42));
}

#[test]
fn rejection_postpones_the_next_success() {
    let clock = FakeClock::new();
    let gate = gate(&clock);
    gate.release(42); // cooldown window starts now

    // Poke every second; each rejection restamps last_action, so the gate
    // never opens while the user keeps hammering it.
    for _ in 0..5 {
        clock.advance(Duration::from_secs(1));
        assert!(!gate.try_acquire(42));
    }
    clock.advance(Duration::from_secs(2));
    assert!(gate.try_acquire(42));
}

#[test]
fn users_are_independent() {
    let clock = FakeClock::new();
    let gate = gate(&clock);
    assert!(gate.try_acquire(1));
    assert!(gate.try_acquire(2));
    assert!(!gate.try_acquire(1));
}

#[test]
fn release_without_acquire_only_stamps_cooldown() {
    let clock = FakeClock::new();
    let gate = gate(&clock);
    gate.release(7);
    assert!(!gate.try_acquire(7));
    clock.advance(Duration::from_secs(2));
    assert!(gate.try_acquire(7));
}

#[test]
fn reset_forgets_cooldown() {
    let clock = FakeClock::new();
    let gate = gate(&clock);
    assert!(gate.try_acquire(9));
    gate.reset(9);
    assert!(gate.try_acquire(9), "reset clears busy and cooldown");
}

#[test]
fn clones_share_state() {
    let clock = FakeClock::new();
    let gate = gate(&clock);
    let other = gate.clone();
    assert!(gate.try_acquire(5));
    assert!(!other.try_acquire(5));
    other.release(5);
    clock.advance(Duration::from_secs(3));
    assert!(gate.try_acquire(5));
}
