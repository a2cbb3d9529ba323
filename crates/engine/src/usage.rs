// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Usage counters: record touches, page through per-user totals

use tess_core::UserId;
use tess_storage::{Store, StoreError, UsageRow};

const DEFAULT_PAGE_SIZE: i64 = 20;

/// One requested page of usage data, clamped into range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageReport {
    pub rows: Vec<UsageRow>,
    pub total_users: i64,
    pub total_events: i64,
    pub page: i64,
    pub pages: i64,
}

/// Records user touches and serves paged leaderboards.
#[derive(Clone)]
pub struct UsageStatsService {
    store: Store,
    page_size: i64,
}

impl UsageStatsService {
    pub fn new(store: Store, page_size: Option<i64>) -> Self {
        Self { store, page_size: page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1) }
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    /// Count a touch. `is_message` marks real content (image or text), as
    /// opposed to a bare command.
    pub async fn record(
        &self,
        user_id: UserId,
        username: Option<String>,
        display_name: Option<String>,
        is_message: bool,
    ) -> Result<(), StoreError> {
        self.store.increment_usage(user_id, username, display_name, is_message).await
    }

    /// Fetch page `page` (1-based). A request past the end lands on the
    /// last page rather than an empty one.
    pub async fn page(&self, page: i64) -> Result<UsageReport, StoreError> {
        let mut target = page.max(1);
        let mut fetched =
            self.store.usage_page((target - 1) * self.page_size, self.page_size).await?;
        let pages = if fetched.total_users == 0 {
            1
        } else {
            (fetched.total_users + self.page_size - 1) / self.page_size
        };
        if target > pages {
            target = pages;
            fetched =
                self.store.usage_page((target - 1) * self.page_size, self.page_size).await?;
        }
        Ok(UsageReport {
            rows: fetched.rows,
            total_users: fetched.total_users,
            total_events: fetched.total_events,
            page: target,
            pages,
        })
    }
}

#[cfg(test)]
#[path = "usage_tests.rs"]
mod tests;
