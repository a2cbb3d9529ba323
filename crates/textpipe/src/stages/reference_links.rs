// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Malformed reference-link rewriting
//!
//! `[text][label]` with no `[label]:` definition anywhere in the text is an
//! artifact. When `text` looks like a domain the pair becomes a plain URL,
//! otherwise the bare text survives; orphaned definitions of converted
//! labels are dropped.

use crate::context::ScrubContext;
use crate::pipeline::Stage;
use crate::scrub::cleanup_punctuation_and_spaces;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static REF_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]+)\]\s*\[([^\]]+)\]").expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static DOMAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:https?://)?(?:[a-zA-Z0-9-]+\.)+[a-zA-Z]{2,}[^\s]*$")
        .expect("constant regex pattern is valid")
});

const STRIP_CHARS: &str = " \t\n\r\u{0B}\u{0C}(),.;:!?'\"";

struct RefMatch {
    start: usize,
    end: usize,
    content: String,
    label: String,
}

/// Rewrites undefined reference-style links into URLs or bare text.
pub struct ReferenceLinks;

impl Stage for ReferenceLinks {
    fn name(&self) -> &str {
        super::REFERENCE_LINKS
    }

    #[allow(clippy::cast_possible_wrap)]
    fn apply(&self, ctx: &mut ScrubContext) {
        let text = ctx.text.clone();
        let matches: Vec<RefMatch> = REF_LINK
            .captures_iter(&text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                Some(RefMatch {
                    start: whole.start(),
                    end: whole.end(),
                    content: caps.get(1)?.as_str().to_string(),
                    label: caps.get(2)?.as_str().to_string(),
                })
            })
            .collect();
        if matches.is_empty() {
            return;
        }

        let labels: HashSet<&str> = matches.iter().map(|m| m.label.as_str()).collect();
        let defined: HashSet<&str> =
            labels.iter().copied().filter(|label| has_definition(&text, label)).collect();

        let mut out = text.clone();
        let mut converted = 0i64;
        for reference in matches.iter().rev() {
            if defined.contains(reference.label.as_str()) {
                continue;
            }
            let stripped =
                reference.content.trim_matches(|c: char| STRIP_CHARS.contains(c));
            let replacement = if !stripped.is_empty() && DOMAIN.is_match(stripped) {
                if stripped.starts_with("http://") || stripped.starts_with("https://") {
                    stripped.to_string()
                } else {
                    format!("https://{stripped}")
                }
            } else {
                reference.content.clone()
            };
            out.replace_range(reference.start..reference.end, &replacement);
            converted += 1;
        }

        if converted > 0 {
            for label in labels.iter().filter(|l| !defined.contains(*l)) {
                if let Ok(orphan) =
                    Regex::new(&format!(r"(?m)^\s*\[{}\]\s*:.*$", regex::escape(label)))
                {
                    out = orphan.replace_all(&out, "").into_owned();
                }
            }
            out = cleanup_punctuation_and_spaces(&out);
            ctx.set_text(out);
            ctx.add_stat("reference_links", converted);
        }
    }
}

fn has_definition(text: &str, label: &str) -> bool {
    Regex::new(&format!(r"(?m)^\s*\[{}\]\s*:\s*\S+", regex::escape(label)))
        .map(|re| re.is_match(text))
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "reference_links_tests.rs"]
mod tests;
