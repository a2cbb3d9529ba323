// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deep-link tracking records

use crate::UserId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Kind of tracking event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// User opened the bot through a start deep link.
    Start,
    /// User followed an in-chat button for the link.
    Visit,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Start => "start",
            EventKind::Visit => "visit",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "start" => Some(EventKind::Start),
            "visit" => Some(EventKind::Visit),
            _ => None,
        }
    }
}

/// An issued deep link. Soft-deleted links keep their row but free the slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingLink {
    pub link_id: i64,
    pub tag: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl TrackingLink {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// One recorded touch of a tracking link.
///
/// `first_start` is true iff no prior event existed for
/// `(link_id, user_id)` at append time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingEvent {
    pub event_id: i64,
    pub link_id: i64,
    pub user_id: UserId,
    pub kind: EventKind,
    pub first_start: bool,
    pub created_at: DateTime<Utc>,
}

/// Aggregated event counts for one link, optionally for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkStats {
    pub link_id: i64,
    pub tag: String,
    pub slug: String,
    pub day: Option<NaiveDate>,
    pub total_events: i64,
    pub unique_users: i64,
    pub first_starts: i64,
}

#[cfg(test)]
#[path = "tracking_tests.rs"]
mod tests;
