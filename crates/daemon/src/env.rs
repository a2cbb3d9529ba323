// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment-derived configuration

use std::collections::HashSet;
use std::path::PathBuf;
use tess_core::{GridOption, UserId};
use thiserror::Error;

/// Errors from configuration loading
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required configuration: {0}")]
    Missing(&'static str),

    #[error("bad value for {key}: {value:?} ({reason})")]
    Invalid { key: &'static str, value: String, reason: String },
}

/// Log verbosity as the environment spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "DEBUG" => Some(LogLevel::Debug),
            "INFO" => Some(LogLevel::Info),
            "WARNING" => Some(LogLevel::Warning),
            "ERROR" => Some(LogLevel::Error),
            _ => None,
        }
    }

    /// Directive understood by tracing's EnvFilter.
    pub fn directive(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_name: String,
    pub fragment_host: Option<String>,
    pub storage_path: PathBuf,
    pub temp_dir: PathBuf,
    pub temp_retention_minutes: u64,
    pub emoji_padding_default: u8,
    pub emoji_grid_default: GridOption,
    pub emoji_queue_workers: usize,
    pub emoji_max_tiles: u32,
    pub emoji_creation_limit: u32,
    pub emoji_tile_size: u32,
    pub emoji_grid_tile_cap: Option<u32>,
    pub admin_user_ids: HashSet<UserId>,
    pub log_level: LogLevel,
}

impl Config {
    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any key lookup. Tests feed a map instead of mutating the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bot_name = lookup("BOT_NAME")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("BOT_NAME"))?;

        let fragment_host =
            lookup("FRAGMENT_HOST").map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let storage_path =
            PathBuf::from(lookup("STORAGE_PATH").unwrap_or_else(|| "./data/state.db".to_string()));
        let temp_dir =
            PathBuf::from(lookup("TMP_DIR").unwrap_or_else(|| "./data/tmp".to_string()));

        let temp_retention_minutes =
            ranged(&lookup, "TMP_RETENTION_MINUTES", 15u64, 1, 120)?;
        let emoji_padding_default = ranged(&lookup, "EMOJI_PADDING_DEFAULT", 2u8, 0, 5)?;
        let emoji_queue_workers = ranged(&lookup, "EMOJI_QUEUE_WORKERS", 2usize, 1, 8)?;
        let emoji_max_tiles = ranged(&lookup, "EMOJI_MAX_TILES", 200u32, 1, u32::MAX)?;
        let emoji_creation_limit = ranged(&lookup, "EMOJI_CREATION_LIMIT", 50u32, 1, u32::MAX)?;
        let emoji_tile_size = ranged(&lookup, "EMOJI_TILE_SIZE", 100u32, 64, 512)?;

        let emoji_grid_tile_cap = match lookup("EMOJI_GRID_TILE_CAP") {
            None => None,
            Some(raw) => Some(parse_number(
                "EMOJI_GRID_TILE_CAP",
                &raw,
                1,
                u32::MAX,
            )?),
        };

        let grid_raw = lookup("EMOJI_GRID_DEFAULT").unwrap_or_else(|| "2x2".to_string());
        let emoji_grid_default =
            GridOption::decode(&grid_raw).map_err(|err| ConfigError::Invalid {
                key: "EMOJI_GRID_DEFAULT",
                value: grid_raw.clone(),
                reason: err.to_string(),
            })?;

        let log_level = match lookup("LOG_LEVEL") {
            None => LogLevel::default(),
            Some(raw) => LogLevel::parse(&raw).ok_or(ConfigError::Invalid {
                key: "LOG_LEVEL",
                value: raw,
                reason: "expected DEBUG|INFO|WARNING|ERROR".to_string(),
            })?,
        };

        Ok(Self {
            bot_name,
            fragment_host,
            storage_path,
            temp_dir,
            temp_retention_minutes,
            emoji_padding_default,
            emoji_grid_default,
            emoji_queue_workers,
            emoji_max_tiles,
            emoji_creation_limit,
            emoji_tile_size,
            emoji_grid_tile_cap,
            admin_user_ids: parse_admin_ids(lookup("ADMIN_USER_IDS").as_deref()),
            log_level,
        })
    }

    /// Effective per-submission tile ceiling.
    pub fn grid_limit(&self) -> u32 {
        self.emoji_max_tiles.min(self.emoji_creation_limit)
    }
}

/// Comma/space/semicolon-separated integers; non-integer tokens are
/// ignored.
fn parse_admin_ids(raw: Option<&str>) -> HashSet<UserId> {
    raw.map(|raw| {
        raw.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .filter_map(|token| token.parse::<UserId>().ok())
            .collect()
    })
    .unwrap_or_default()
}

fn ranged<T>(
    lookup: impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
    min: T,
    max: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + std::fmt::Display + Copy,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => parse_number(key, &raw, min, max),
    }
}

fn parse_number<T>(key: &'static str, raw: &str, min: T, max: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + std::fmt::Display + Copy,
{
    let parsed = raw.trim().parse::<T>().map_err(|_| ConfigError::Invalid {
        key,
        value: raw.to_string(),
        reason: "not a number".to_string(),
    })?;
    if parsed < min || parsed > max {
        return Err(ConfigError::Invalid {
            key,
            value: raw.to_string(),
            reason: format!("must be in {min}..={max}"),
        });
    }
    Ok(parsed)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
