// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! tracking_links / tracking_events tables

use crate::store::{decode_ts, encode_ts, Store, StoreError};
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, OptionalExtension, Row};
use tess_core::{EventKind, LinkStats, TrackingEvent, TrackingLink, UserId};

fn row_to_link(row: &Row<'_>) -> rusqlite::Result<(i64, String, String, String, Option<String>)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn link_from_tuple(
    (link_id, tag, slug, created_at, deleted_at): (i64, String, String, String, Option<String>),
) -> Result<TrackingLink, StoreError> {
    Ok(TrackingLink {
        link_id,
        tag,
        slug,
        created_at: decode_ts(&created_at)?,
        deleted_at: deleted_at.as_deref().map(decode_ts).transpose()?,
    })
}

fn day_floor(date: NaiveDate) -> String {
    encode_ts(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
}

const LINK_COLUMNS: &str = "link_id, tag, slug, created_at, deleted_at";

impl Store {
    pub async fn create_link(&self, tag: String, slug: String) -> Result<TrackingLink, StoreError> {
        self.call(move |conn| {
            let now = Utc::now();
            conn.execute(
                "INSERT INTO tracking_links (tag, slug, created_at, deleted_at)
                 VALUES (?1, ?2, ?3, NULL)",
                params![tag, slug, encode_ts(now)],
            )?;
            Ok(TrackingLink {
                link_id: conn.last_insert_rowid(),
                tag,
                slug,
                created_at: now,
                deleted_at: None,
            })
        })
        .await
    }

    pub async fn get_link(
        &self,
        link_id: i64,
        include_deleted: bool,
    ) -> Result<Option<TrackingLink>, StoreError> {
        self.call(move |conn| {
            let mut sql =
                format!("SELECT {LINK_COLUMNS} FROM tracking_links WHERE link_id = ?1");
            if !include_deleted {
                sql.push_str(" AND deleted_at IS NULL");
            }
            let row = conn.query_row(&sql, params![link_id], row_to_link).optional()?;
            row.map(link_from_tuple).transpose()
        })
        .await
    }

    pub async fn get_link_by_slug(
        &self,
        slug: String,
        include_deleted: bool,
    ) -> Result<Option<TrackingLink>, StoreError> {
        self.call(move |conn| {
            let mut sql = format!("SELECT {LINK_COLUMNS} FROM tracking_links WHERE slug = ?1");
            if !include_deleted {
                sql.push_str(" AND deleted_at IS NULL");
            }
            let row = conn.query_row(&sql, params![slug], row_to_link).optional()?;
            row.map(link_from_tuple).transpose()
        })
        .await
    }

    /// Links newest-first; active only unless `include_deleted`.
    pub async fn list_links(
        &self,
        include_deleted: bool,
    ) -> Result<Vec<TrackingLink>, StoreError> {
        self.call(move |conn| {
            let mut sql = format!("SELECT {LINK_COLUMNS} FROM tracking_links");
            if !include_deleted {
                sql.push_str(" WHERE deleted_at IS NULL");
            }
            sql.push_str(" ORDER BY created_at DESC");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], row_to_link)?.collect::<Result<Vec<_>, _>>()?;
            rows.into_iter().map(link_from_tuple).collect()
        })
        .await
    }

    /// Soft-delete; returns false when the link is unknown or already gone.
    pub async fn soft_delete_link(&self, link_id: i64) -> Result<bool, StoreError> {
        self.call(move |conn| {
            let affected = conn.execute(
                "UPDATE tracking_links SET deleted_at = ?1
                 WHERE link_id = ?2 AND deleted_at IS NULL",
                params![encode_ts(Utc::now()), link_id],
            )?;
            Ok(affected > 0)
        })
        .await
    }

    pub async fn log_event(
        &self,
        link_id: i64,
        user_id: UserId,
        kind: EventKind,
        first_start: bool,
    ) -> Result<TrackingEvent, StoreError> {
        self.call(move |conn| {
            let now = Utc::now();
            conn.execute(
                "INSERT INTO tracking_events (link_id, user_id, kind, first_start, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![link_id, user_id, kind.as_str(), i64::from(first_start), encode_ts(now)],
            )?;
            Ok(TrackingEvent {
                event_id: conn.last_insert_rowid(),
                link_id,
                user_id,
                kind,
                first_start,
                created_at: now,
            })
        })
        .await
    }

    pub async fn has_user_event(&self, link_id: i64, user_id: UserId) -> Result<bool, StoreError> {
        self.call(move |conn| {
            let hit = conn
                .query_row(
                    "SELECT 1 FROM tracking_events WHERE link_id = ?1 AND user_id = ?2 LIMIT 1",
                    params![link_id, user_id],
                    |_row| Ok(()),
                )
                .optional()?;
            Ok(hit.is_some())
        })
        .await
    }

    /// Events for one link, newest first, optionally windowed by calendar
    /// day (the end day is inclusive).
    pub async fn events_for_link(
        &self,
        link_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<TrackingEvent>, StoreError> {
        self.call(move |conn| {
            let mut sql = String::from(
                "SELECT event_id, link_id, user_id, kind, first_start, created_at
                 FROM tracking_events WHERE link_id = ?1",
            );
            let mut bind: Vec<Value> = vec![Value::Integer(link_id)];
            if let Some(start) = start {
                sql.push_str(" AND created_at >= ?");
                bind.push(Value::Text(day_floor(start)));
            }
            if let Some(end) = end {
                sql.push_str(" AND created_at < ?");
                bind.push(Value::Text(day_floor(end + chrono::Days::new(1))));
            }
            sql.push_str(" ORDER BY created_at DESC");

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params_from_iter(bind), |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, i64>(4)?,
                        row.get::<_, String>(5)?,
                    ))
                })?
                .collect::<Result<Vec<_>, _>>()?;
            rows.into_iter()
                .map(|(event_id, link_id, user_id, kind, first_start, created_at)| {
                    Ok(TrackingEvent {
                        event_id,
                        link_id,
                        user_id,
                        kind: EventKind::parse(&kind).unwrap_or(EventKind::Visit),
                        first_start: first_start != 0,
                        created_at: decode_ts(&created_at)?,
                    })
                })
                .collect()
        })
        .await
    }

    /// Aggregate `(total_events, unique_users, first_starts)` per active
    /// link, optionally filtered to `link_ids` and a day window, optionally
    /// grouped per day.
    pub async fn aggregate_stats(
        &self,
        link_ids: Option<Vec<i64>>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        daily: bool,
    ) -> Result<Vec<LinkStats>, StoreError> {
        self.call(move |conn| {
            let day_column = if daily { "date(e.created_at)" } else { "NULL" };
            let mut sql = format!(
                "SELECT l.link_id, l.tag, l.slug, {day_column} AS event_date,
                        COUNT(*) AS total_events,
                        COUNT(DISTINCT e.user_id) AS unique_users,
                        SUM(e.first_start) AS first_starts
                 FROM tracking_links l
                 INNER JOIN tracking_events e ON l.link_id = e.link_id
                 WHERE l.deleted_at IS NULL"
            );
            let mut bind: Vec<Value> = Vec::new();
            if let Some(ids) = &link_ids {
                let placeholders = vec!["?"; ids.len()].join(",");
                sql.push_str(&format!(" AND l.link_id IN ({placeholders})"));
                bind.extend(ids.iter().map(|id| Value::Integer(*id)));
            }
            if let Some(start) = start {
                sql.push_str(" AND e.created_at >= ?");
                bind.push(Value::Text(day_floor(start)));
            }
            if let Some(end) = end {
                sql.push_str(" AND e.created_at < ?");
                bind.push(Value::Text(day_floor(end + chrono::Days::new(1))));
            }
            if daily {
                sql.push_str(
                    " GROUP BY l.link_id, l.tag, l.slug, event_date
                      ORDER BY event_date, l.link_id",
                );
            } else {
                sql.push_str(" GROUP BY l.link_id, l.tag, l.slug ORDER BY l.link_id");
            }

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params_from_iter(bind), |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, Option<String>>(3)?,
                        row.get::<_, i64>(4)?,
                        row.get::<_, i64>(5)?,
                        row.get::<_, Option<i64>>(6)?,
                    ))
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows
                .into_iter()
                .map(|(link_id, tag, slug, day, total_events, unique_users, first_starts)| {
                    LinkStats {
                        link_id,
                        tag,
                        slug,
                        day: day
                            .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
                        total_events,
                        unique_users,
                        first_starts: first_starts.unwrap_or(0),
                    }
                })
                .collect())
        })
        .await
    }
}

#[cfg(test)]
#[path = "tracking_tests.rs"]
mod tests;
