// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracking core: deep-link issuance and the first-touch event ledger

use crate::payload::{decode_payload, encode_link_id, PayloadError};
use crate::slug::{resolve_collision, slug_with_fallback, validate_slug};
use chrono::NaiveDate;
use std::collections::HashSet;
use tess_core::{EventKind, LinkStats, TrackingEvent, TrackingLink, UserId};
use tess_storage::{Store, StoreError};
use thiserror::Error;

/// Errors from tracking operations
#[derive(Debug, Error)]
pub enum TrackingError {
    #[error("tag must not be empty")]
    EmptyTag,

    #[error("slug {0:?} is invalid: lowercase letters, digits, hyphens, max 50, no edge hyphens")]
    InvalidSlug(String),

    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl tess_core::Failure for TrackingError {
    fn kind(&self) -> tess_core::FailureKind {
        match self {
            TrackingError::EmptyTag
            | TrackingError::InvalidSlug(_)
            | TrackingError::Payload(_) => tess_core::FailureKind::InputInvalid,
            TrackingError::Store(err) => tess_core::Failure::kind(err),
        }
    }
}

/// Issues deep links and records their first-touch event ledger.
#[derive(Clone)]
pub struct TrackingService {
    store: Store,
    bot_host: String,
    bot_name: String,
}

impl TrackingService {
    pub fn new(store: Store, bot_host: impl Into<String>, bot_name: impl Into<String>) -> Self {
        Self { store, bot_host: bot_host.into(), bot_name: bot_name.into() }
    }

    /// Create a link under `tag`. An explicit slug is validated; an omitted
    /// one is derived from the tag. Either way a collision with an active
    /// slug gets a numeric suffix.
    pub async fn create(
        &self,
        tag: &str,
        slug: Option<&str>,
    ) -> Result<(TrackingLink, String), TrackingError> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(TrackingError::EmptyTag);
        }
        let base = match slug {
            Some(explicit) => {
                let explicit = explicit.trim();
                if !validate_slug(explicit) {
                    return Err(TrackingError::InvalidSlug(explicit.to_string()));
                }
                explicit.to_string()
            }
            None => slug_with_fallback(tag),
        };

        let active: HashSet<String> =
            self.store.list_links(false).await?.into_iter().map(|l| l.slug).collect();
        let slug = resolve_collision(&base, &active);

        let link = self.store.create_link(tag.to_string(), slug).await?;
        let url = self.start_url(link.link_id)?;
        tracing::info!(link_id = link.link_id, slug = %link.slug, "tracking link issued");
        Ok((link, url))
    }

    /// A fresh start URL for an existing link; every call yields a new
    /// payload string.
    pub fn start_url(&self, link_id: i64) -> Result<String, TrackingError> {
        let payload = encode_link_id(link_id)?;
        Ok(format!("https://{}/{}?start={payload}", self.bot_host, self.bot_name))
    }

    /// Decode a start payload and record the event. Returns `None` without
    /// recording when the payload is malformed or the link is gone.
    pub async fn handle_start(
        &self,
        payload: &str,
        user_id: UserId,
    ) -> Result<Option<(TrackingLink, bool)>, TrackingError> {
        let link_id = match decode_payload(payload) {
            Ok(link_id) => link_id,
            Err(_) => return Ok(None),
        };
        let Some(link) = self.store.get_link(link_id, false).await? else {
            return Ok(None);
        };
        let first_start = !self.store.has_user_event(link_id, user_id).await?;
        self.store.log_event(link_id, user_id, EventKind::Start, first_start).await?;
        Ok(Some((link, first_start)))
    }

    /// Record an in-chat button touch. Never a first start.
    pub async fn log_visit(
        &self,
        link_id: i64,
        user_id: UserId,
    ) -> Result<TrackingEvent, TrackingError> {
        Ok(self.store.log_event(link_id, user_id, EventKind::Visit, false).await?)
    }

    pub async fn get_link(&self, link_id: i64) -> Result<Option<TrackingLink>, TrackingError> {
        Ok(self.store.get_link(link_id, false).await?)
    }

    pub async fn get_link_by_slug(&self, slug: &str) -> Result<Option<TrackingLink>, TrackingError> {
        Ok(self.store.get_link_by_slug(slug.to_string(), false).await?)
    }

    /// Active links, newest first.
    pub async fn list_links(&self) -> Result<Vec<TrackingLink>, TrackingError> {
        Ok(self.store.list_links(false).await?)
    }

    /// Soft-delete, freeing the slug for reuse.
    pub async fn delete(&self, link_id: i64) -> Result<bool, TrackingError> {
        Ok(self.store.soft_delete_link(link_id).await?)
    }

    pub async fn events(
        &self,
        link_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<TrackingEvent>, TrackingError> {
        Ok(self.store.events_for_link(link_id, start, end).await?)
    }

    pub async fn stats(
        &self,
        link_ids: Option<Vec<i64>>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        daily: bool,
    ) -> Result<Vec<LinkStats>, TrackingError> {
        Ok(self.store.aggregate_stats(link_ids, start, end, daily).await?)
    }
}

#[cfg(test)]
#[path = "tracking_tests.rs"]
mod tests;
