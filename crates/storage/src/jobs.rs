// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! emoji_jobs table: the job cache keyed by (user, hash, grid, padding)

use crate::store::{decode_ts, encode_ts, Store, StoreError};
use rusqlite::{params, OptionalExtension};
use tess_core::{JobOutcome, PackRequest, PackResult};

impl Store {
    /// Record a finished job under its cache fingerprint, replacing any
    /// prior row with the same key.
    pub async fn save_job_outcome(&self, outcome: JobOutcome) -> Result<(), StoreError> {
        self.call(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO emoji_jobs (
                     user_id, image_hash, grid, padding,
                     short_name, link, custom_emoji_ids, fragment_preview_id, created_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    outcome.request.user_id,
                    outcome.request.image_hash,
                    outcome.request.grid.encode(),
                    i64::from(outcome.request.padding),
                    outcome.result.short_name,
                    outcome.result.link,
                    serde_json::to_string(&outcome.result.custom_emoji_ids)?,
                    outcome.result.fragment_preview_id,
                    encode_ts(outcome.created_at),
                ],
            )?;
            Ok(())
        })
        .await
    }

    /// Look up a prior outcome for this request's fingerprint.
    ///
    /// The processing path never reads this — every submission reprocesses
    /// and overwrites — so the row is bookkeeping. This accessor marks the
    /// seam where a cache lookup would go if the policy changes.
    pub async fn get_cached_job(
        &self,
        request: &PackRequest,
    ) -> Result<Option<JobOutcome>, StoreError> {
        let request = request.clone();
        self.call(move |conn| {
            let row = conn
                .query_row(
                    "SELECT short_name, link, custom_emoji_ids, fragment_preview_id, created_at
                     FROM emoji_jobs
                     WHERE user_id = ?1 AND image_hash = ?2 AND grid = ?3 AND padding = ?4",
                    params![
                        request.user_id,
                        request.image_hash,
                        request.grid.encode(),
                        i64::from(request.padding),
                    ],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, Option<String>>(3)?,
                            row.get::<_, String>(4)?,
                        ))
                    },
                )
                .optional()?;
            match row {
                None => Ok(None),
                Some((short_name, link, ids, fragment_preview_id, created_at)) => {
                    let custom_emoji_ids: Vec<String> = serde_json::from_str(&ids)?;
                    Ok(Some(JobOutcome {
                        request,
                        result: PackResult { short_name, link, custom_emoji_ids, fragment_preview_id },
                        created_at: decode_ts(&created_at)?,
                    }))
                }
            }
        })
        .await
    }
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
