// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-user admission gate: one in-flight submission plus a cooldown

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tess_core::{Clock, SystemClock, UserId};

const DEFAULT_COOLDOWN: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy)]
struct GateState {
    busy: bool,
    last_action: Instant,
}

struct Inner<C> {
    cooldown: Duration,
    clock: C,
    states: Mutex<HashMap<UserId, GateState>>,
}

/// Cooperative per-user lock with quiet-period semantics.
///
/// `try_acquire` refreshes `last_action` on rejection too, so hammering
/// the gate during the cooldown keeps pushing the next success out.
#[derive(Clone)]
pub struct AdmissionGate<C: Clock = SystemClock> {
    inner: Arc<Inner<C>>,
}

impl AdmissionGate<SystemClock> {
    pub fn new(cooldown: Option<Duration>) -> Self {
        Self::with_clock(cooldown, SystemClock)
    }
}

impl<C: Clock> AdmissionGate<C> {
    pub fn with_clock(cooldown: Option<Duration>, clock: C) -> Self {
        Self {
            inner: Arc::new(Inner {
                cooldown: cooldown.unwrap_or(DEFAULT_COOLDOWN),
                clock,
                states: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Accept the user iff they are not busy and the cooldown has elapsed.
    /// `last_action` is stamped on both outcomes.
    pub fn try_acquire(&self, user_id: UserId) -> bool {
        let now = self.inner.clock.now();
        let mut states = self.inner.states.lock();
        if let Some(state) = states.get_mut(&user_id) {
            if state.busy || now.saturating_duration_since(state.last_action) < self.inner.cooldown
            {
                state.last_action = now;
                return false;
            }
        }
        states.insert(user_id, GateState { busy: true, last_action: now });
        true
    }

    /// Clear the busy flag and start the cooldown window.
    pub fn release(&self, user_id: UserId) {
        let now = self.inner.clock.now();
        self.inner
            .states
            .lock()
            .insert(user_id, GateState { busy: false, last_action: now });
    }

    /// Forget the user entirely; the next `try_acquire` succeeds.
    pub fn reset(&self, user_id: UserId) {
        self.inner.states.lock().remove(&user_id);
    }
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
