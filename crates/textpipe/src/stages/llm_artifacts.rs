// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Citation-artifact removal
//!
//! Strips `turn<digits><type><digits>` citation tokens, `cite` prefixes, and
//! any bracketed group whose contents (at any nesting depth) carry such a
//! marker. Bracket groups are found with a stack scan; a marker propagates
//! outward so the widest enclosing group is removed as one unit.

use crate::context::ScrubContext;
use crate::pipeline::Stage;
use crate::scrub::{
    cleanup_punctuation_and_spaces, drop_empty_lines_and_list_items, remove_empty_brackets,
};
use regex::Regex;
use std::sync::LazyLock;

const TYPE_PART: &str = "(?:search|click|fetch|view|news|image|product|sports|finance|forecast|time|maps|calc|translate|msearch|mclick)";

fn token_pattern() -> String {
    format!(r"\bturn\d+{TYPE_PART}\d+\b")
}

#[allow(clippy::expect_used)]
static TURN_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("(?i){}", token_pattern())).expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static TURN_SEQ: LazyLock<Regex> = LazyLock::new(|| {
    let token = token_pattern();
    Regex::new(&format!(r"(?i)(?:{token})(?:\s+(?:{token}))*"))
        .expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static CITE_SEQ: LazyLock<Regex> = LazyLock::new(|| {
    let token = token_pattern();
    Regex::new(&format!(r"(?i)\bcite\b(?:\s+{token})+")).expect("constant regex pattern is valid")
});

/// Removes LLM citation artifacts and the bracket groups that carried them.
pub struct LlmArtifacts;

impl Stage for LlmArtifacts {
    fn name(&self) -> &str {
        super::LLM_ARTIFACTS
    }

    #[allow(clippy::cast_possible_wrap)]
    fn apply(&self, ctx: &mut ScrubContext) {
        let mut tokens = 0i64;
        let mut cites = 0i64;
        let mut groups = 0i64;

        let mut text = remove_marked_bracket_groups(&ctx.text, &mut groups);

        let cite_hits = CITE_SEQ.find_iter(&text).count();
        if cite_hits > 0 {
            text = CITE_SEQ.replace_all(&text, "").into_owned();
            cites += cite_hits as i64;
        }

        let token_hits = TURN_SEQ.find_iter(&text).count();
        if token_hits > 0 {
            text = TURN_SEQ.replace_all(&text, "").into_owned();
            tokens += token_hits as i64;
        }

        text = cleanup_punctuation_and_spaces(&text);
        // Second pass: cleanup can fuse fragments into fresh token matches.
        text = TURN_SEQ.replace_all(&text, "").into_owned();
        text = remove_empty_brackets(&text);
        text = cleanup_punctuation_and_spaces(&text);
        text = drop_empty_lines_and_list_items(&text);

        ctx.set_text(text);
        for (key, value) in
            [("llm_tokens", tokens), ("llm_cite", cites), ("llm_bracket_groups", groups)]
        {
            if !ctx.stats.contains_key(key) {
                ctx.set_stat(key, 0);
            }
            if value != 0 {
                ctx.add_stat(key, value);
            }
        }
    }
}

struct OpenGroup {
    bracket: char,
    pos: usize,
    has_marker: bool,
}

/// Delete every balanced `(…)`, `[…]`, `{…}` group whose contents hold a
/// citation marker, widest enclosing group first. Returns the rewritten
/// string; `removed` counts merged spans actually cut.
#[allow(clippy::cast_possible_wrap)]
fn remove_marked_bracket_groups(s: &str, removed: &mut i64) -> String {
    let mut stack: Vec<OpenGroup> = Vec::new();
    let mut removable: Vec<(usize, usize)> = Vec::new();

    for (i, ch) in s.char_indices() {
        match ch {
            '(' | '[' | '{' => stack.push(OpenGroup { bracket: ch, pos: i, has_marker: false }),
            ')' | ']' | '}' => {
                let expected = match ch {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                if stack.last().map(|top| top.bracket) == Some(expected) {
                    if let Some(top) = stack.pop() {
                        let inner = &s[top.pos + 1..i];
                        let has_marker = top.has_marker
                            || CITE_SEQ.is_match(inner)
                            || TURN_TOKEN.is_match(inner);
                        if has_marker {
                            removable.push((top.pos, i));
                            if let Some(parent) = stack.last_mut() {
                                parent.has_marker = true;
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }

    if removable.is_empty() {
        return s.to_string();
    }

    removable.sort_unstable();
    let mut merged: Vec<(usize, usize)> = Vec::new();
    for (start, end) in removable {
        match merged.last_mut() {
            Some((_, prev_end)) if start <= *prev_end + 1 => *prev_end = (*prev_end).max(end),
            _ => merged.push((start, end)),
        }
    }

    *removed += merged.len() as i64;
    let mut out = String::with_capacity(s.len());
    let mut cursor = 0usize;
    for (start, end) in &merged {
        out.push_str(&s[cursor..*start]);
        cursor = end + 1;
    }
    out.push_str(&s[cursor..]);
    out
}

#[cfg(test)]
#[path = "llm_artifacts_tests.rs"]
mod tests;
