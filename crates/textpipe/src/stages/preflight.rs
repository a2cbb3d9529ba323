// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pre-transformation artifact counting

use crate::context::ScrubContext;
use crate::pipeline::Stage;
use regex::Regex;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static DASHES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\u{2012}\u{2013}\u{2014}\u{2015}\u{2212}]")
        .expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static QUOTES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\u{00AB}\u{00BB}\u{201C}\u{201D}\u{201E}\u{201F}\u{2039}\u{203A}\u{2018}\u{2019}]")
        .expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static BULLETS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*[\u{2022}\u{2023}\u{25E6}\u{2043}\u{2219}\-\u{2013}\u{2014}][ \t]+")
        .expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static NBSP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\u{00A0}").expect("constant regex pattern is valid"));

/// Counts dash, quote, bullet, and non-breaking-space artifacts before any
/// stage mutates the text.
pub struct PreflightStats;

impl Stage for PreflightStats {
    fn name(&self) -> &str {
        super::PREFLIGHT
    }

    fn apply(&self, ctx: &mut ScrubContext) {
        let text = ctx.text.clone();
        #[allow(clippy::cast_possible_wrap)]
        {
            ctx.set_stat("dashes", DASHES.find_iter(&text).count() as i64);
            ctx.set_stat("quotes", QUOTES.find_iter(&text).count() as i64);
            ctx.set_stat("bullets", BULLETS.find_iter(&text).count() as i64);
            ctx.set_stat("nbsp", NBSP.find_iter(&text).count() as i64);
        }
    }
}

#[cfg(test)]
#[path = "preflight_tests.rs"]
mod tests;
