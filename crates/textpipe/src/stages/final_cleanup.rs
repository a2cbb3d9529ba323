// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal whitespace/bracket sweep

use crate::context::ScrubContext;
use crate::pipeline::Stage;
use crate::scrub::{
    cleanup_punctuation_and_spaces, drop_empty_lines_and_list_items, remove_empty_brackets,
};

/// Final pass: empty bracket pairs, spacing, duplicated punctuation, dead
/// lines, and blank-line runs.
pub struct FinalCleanup;

impl Stage for FinalCleanup {
    fn name(&self) -> &str {
        super::FINAL_CLEANUP
    }

    fn apply(&self, ctx: &mut ScrubContext) {
        let mut text = remove_empty_brackets(&ctx.text);
        text = cleanup_punctuation_and_spaces(&text);
        text = drop_empty_lines_and_list_items(&text);
        ctx.set_text(text);
    }
}

#[cfg(test)]
#[path = "final_cleanup_tests.rs"]
mod tests;
