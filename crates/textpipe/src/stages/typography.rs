// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typographic normalization: ASCII dashes, straight quotes, plain bullets

use crate::context::ScrubContext;
use crate::pipeline::Stage;
use crate::scrub::{
    cleanup_punctuation_and_spaces, drop_empty_lines_and_list_items, remove_empty_brackets,
};
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

/// Substitutes typographic characters with their plain ASCII forms.
pub struct Typography;

impl Stage for Typography {
    fn name(&self) -> &str {
        super::TYPOGRAPHY
    }

    fn apply(&self, ctx: &mut ScrubContext) {
        let mut text = DASHES.replace_all(&ctx.text, "-").into_owned();
        text = QUOTES.replace_all(&text, "\"").into_owned();
        text = BULLETS.replace_all(&text, "- ").into_owned();
        text = NBSP.replace_all(&text, " ").into_owned();
        text = remove_empty_brackets(&text);
        text = cleanup_punctuation_and_spaces(&text);
        text = drop_empty_lines_and_list_items(&text);
        ctx.set_text(text);
    }
}

#[cfg(test)]
#[path = "typography_tests.rs"]
mod tests;
