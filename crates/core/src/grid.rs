// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Grid geometry for pack slicing

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from parsing or constructing grid options
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("malformed grid spec {0:?}, expected \"RxC\"")]
    Malformed(String),

    #[error("grid dimensions must be at least 1x1")]
    Degenerate,
}

/// A rows × cols partition of a source image.
///
/// Canonical string form is `"RxC"` with a lowercase `x`; the typographic
/// `×` is accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridOption {
    pub rows: u32,
    pub cols: u32,
}

impl GridOption {
    /// The degenerate single-tile grid used whenever nothing better fits.
    pub const FALLBACK: GridOption = GridOption { rows: 1, cols: 1 };

    pub fn new(rows: u32, cols: u32) -> Result<Self, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::Degenerate);
        }
        Ok(Self { rows, cols })
    }

    pub fn tiles(&self) -> u32 {
        self.rows * self.cols
    }

    /// Canonical wire form, e.g. `"2x3"`.
    pub fn encode(&self) -> String {
        format!("{}x{}", self.rows, self.cols)
    }

    /// Display label with tile count, e.g. `"2×3 (6)"`.
    pub fn label(&self) -> String {
        format!("{}×{} ({})", self.rows, self.cols, self.tiles())
    }

    /// Parse `"RxC"`; case-insensitive, `×` accepted.
    pub fn decode(value: &str) -> Result<Self, GridError> {
        let normalized = value.trim().to_ascii_lowercase().replace('×', "x");
        let (rows, cols) =
            normalized.split_once('x').ok_or_else(|| GridError::Malformed(value.to_string()))?;
        let rows =
            rows.trim().parse::<u32>().map_err(|_| GridError::Malformed(value.to_string()))?;
        let cols =
            cols.trim().parse::<u32>().map_err(|_| GridError::Malformed(value.to_string()))?;
        Self::new(rows, cols)
    }
}

impl std::fmt::Display for GridOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Ranked grid suggestions for a probed image.
///
/// Options are sorted by goodness-of-fit, deduplicated, and capped; the
/// fallback is always the first option (or 1×1 when no option fits).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridPlan {
    pub options: Vec<GridOption>,
    pub fallback: GridOption,
}

impl GridPlan {
    pub fn contains(&self, grid: GridOption) -> bool {
        self.options.contains(&grid)
    }

    /// Drop options above `cap` tiles, keeping the plan non-empty.
    ///
    /// When every option exceeds the cap the original plan is returned
    /// unchanged rather than an empty one.
    pub fn capped(self, cap: Option<u32>) -> GridPlan {
        let Some(cap) = cap else { return self };
        let kept: Vec<GridOption> =
            self.options.iter().copied().filter(|o| o.tiles() <= cap).collect();
        match kept.first() {
            Some(first) => GridPlan { fallback: *first, options: kept },
            None => self,
        }
    }
}

#[cfg(test)]
#[path = "grid_tests.rs"]
mod tests;
