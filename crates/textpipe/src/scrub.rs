// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared cleanup helpers used by several stages

use regex::Regex;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static EMPTY_BRACKETS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(\s*\)|\[\s*\]|\{\s*\}").expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static RUNS_OF_BLANKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]{2,}").expect("constant regex pattern is valid"));

#[allow(clippy::expect_used)]
static SPACE_BEFORE_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([,.;:)\]\}])").expect("constant regex pattern is valid"));

#[allow(clippy::expect_used)]
static SPACE_AFTER_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([(\[\{])\s+").expect("constant regex pattern is valid"));

#[allow(clippy::expect_used)]
static LEADING_PUNCT_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[\t ]*[,.;:]\s*").expect("constant regex pattern is valid"));

#[allow(clippy::expect_used)]
static TRAILING_WS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)[ \t]+$").expect("constant regex pattern is valid"));

#[allow(clippy::expect_used)]
static EXCESS_BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("constant regex pattern is valid"));

// One pattern per punctuation mark; the regex crate has no backreferences.
#[allow(clippy::expect_used)]
static DUP_PUNCT: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [(r",\s*,+", ","), (r"\.\s*\.+", "."), (r";\s*;+", ";"), (r":\s*:+", ":")]
        .iter()
        .map(|(p, mark)| (Regex::new(p).expect("constant regex pattern is valid"), *mark))
        .collect()
});

#[allow(clippy::expect_used)]
static SOLITARY_MARKER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*[-*+•][ \t]*$").expect("constant regex pattern is valid"));

#[allow(clippy::expect_used)]
static LIST_ITEM_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*[-*+•][ \t]+(.*)$").expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static EMPTY_CONTENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t*]*$").expect("constant regex pattern is valid"));

/// Delete `()`, `[]`, `{}` pairs (whitespace-only contents included),
/// repeating until nothing changes so nested shells collapse too.
pub fn remove_empty_brackets(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = EMPTY_BRACKETS.replace_all(&current, "").into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Normalize spacing around punctuation and bracket edges.
pub fn cleanup_punctuation_and_spaces(text: &str) -> String {
    let mut out = RUNS_OF_BLANKS.replace_all(text, " ").into_owned();
    out = SPACE_BEFORE_PUNCT.replace_all(&out, "$1").into_owned();
    out = SPACE_AFTER_OPEN.replace_all(&out, "$1").into_owned();
    for (dup, mark) in DUP_PUNCT.iter() {
        out = dup.replace_all(&out, *mark).into_owned();
    }
    out = LEADING_PUNCT_LINE.replace_all(&out, "").into_owned();
    out = TRAILING_WS.replace_all(&out, "").into_owned();
    EXCESS_BLANK_LINES.replace_all(&out, "\n\n").into_owned()
}

/// The Unicode line-break set: LF, CR, CRLF, vertical tab, form feed,
/// the file/group/record separators, NEL, and the LS/PS separators.
const LINE_BREAKS: &[char] = &[
    '\n', '\r', '\u{0B}', '\u{0C}', '\u{1C}', '\u{1D}', '\u{1E}', '\u{85}', '\u{2028}',
    '\u{2029}',
];

/// Split on every Unicode line boundary, treating CRLF as one break. No
/// trailing empty segment for a terminal break.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0usize;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !LINE_BREAKS.contains(&c) {
            continue;
        }
        lines.push(&text[start..i]);
        start = i + c.len_utf8();
        if c == '\r' {
            if let Some((j, '\n')) = chars.peek().copied() {
                chars.next();
                start = j + 1;
            }
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// Drop lines that carry no content once empty brackets are stripped:
/// solitary list markers, marker-only bullets, and bracket shells.
/// Surviving lines are rejoined with plain LF.
pub fn drop_empty_lines_and_list_items(text: &str) -> String {
    let mut lines_out: Vec<&str> = Vec::new();
    for line in split_lines(text) {
        let raw = line.trim_end();
        let stripped = raw.trim();
        if stripped.is_empty() {
            lines_out.push("");
            continue;
        }
        if SOLITARY_MARKER_LINE.is_match(raw) {
            continue;
        }
        if let Some(captures) = LIST_ITEM_LINE.captures(raw) {
            let content = captures.get(1).map_or("", |m| m.as_str());
            if is_empty_content(content) {
                continue;
            }
            lines_out.push(raw);
            continue;
        }
        if is_empty_content(stripped) {
            continue;
        }
        lines_out.push(raw);
    }
    let joined = lines_out.join("\n");
    EXCESS_BLANK_LINES.replace_all(&joined, "\n\n").into_owned()
}

fn is_empty_content(value: &str) -> bool {
    let cleaned = remove_empty_brackets(value);
    EMPTY_CONTENT.is_match(&cleaned) || cleaned.trim().is_empty()
}

#[cfg(test)]
#[path = "scrub_tests.rs"]
mod tests;
