// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Grid suggestion: rank partitions by how square their cells come out

use tess_core::{GridOption, GridPlan};

const MAX_SPAN: u32 = 10;
const DEFAULT_LIMIT: usize = 5;

/// Suggest up to `limit` grids for a `width × height` image.
///
/// Candidates are every `(rows, cols)` in `1..=10 × 1..=10` with
/// `rows * cols <= max_tiles`, scored by `|cell_aspect - 1|` where
/// `cell_aspect = (width / cols) / (height / rows)`. Ties break toward
/// fewer tiles. The fallback is the best-ranked option, or 1×1 when
/// nothing fits.
pub fn suggest_grids(width: u32, height: u32, max_tiles: u32, limit: Option<usize>) -> GridPlan {
    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    let span = MAX_SPAN.min(max_tiles.max(1));
    let mut candidates: Vec<(f64, GridOption)> = Vec::new();
    for rows in 1..=span {
        for cols in 1..=span {
            let tiles = rows * cols;
            if tiles > max_tiles {
                continue;
            }
            let cell_aspect =
                (f64::from(width) / f64::from(cols)) / (f64::from(height) / f64::from(rows));
            let score = (cell_aspect - 1.0).abs();
            candidates.push((score, GridOption { rows, cols }));
        }
    }
    candidates
        .sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.tiles().cmp(&b.1.tiles())));

    let mut options: Vec<GridOption> = Vec::new();
    for (_score, option) in candidates {
        if !options.contains(&option) {
            options.push(option);
        }
        if options.len() >= limit {
            break;
        }
    }

    match options.first() {
        Some(first) => GridPlan { fallback: *first, options },
        None => GridPlan { options: vec![GridOption::FALLBACK], fallback: GridOption::FALLBACK },
    }
}

#[cfg(test)]
#[path = "grid_fit_tests.rs"]
mod tests;
