// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Slug derivation and collision handling for tracking links

use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

pub const MAX_SLUG_LEN: usize = 50;

/// Fold a tag into `[a-z0-9-]`: NFKD-decompose so accented Latin drops to
/// its base letters ("Café" → "cafe"), lowercase, whitespace/underscore
/// runs to hyphens, hyphen runs collapsed, edges trimmed, capped at 50
/// characters. Scripts with no ASCII decomposition fold to nothing.
pub fn normalize_slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for c in text.nfkd().filter(char::is_ascii).flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(c);
        } else if c.is_whitespace() || c == '_' || c == '-' {
            pending_hyphen = true;
        }
    }
    out.truncate(MAX_SLUG_LEN);
    out.trim_end_matches('-').to_string()
}

/// Normalized slug, or `link-<md5(tag)[..8]>` when nothing survives
/// normalization.
pub fn slug_with_fallback(tag: &str) -> String {
    let slug = normalize_slug(tag);
    if slug.is_empty() {
        let digest = format!("{:x}", md5::compute(tag.as_bytes()));
        format!("link-{}", &digest[..8])
    } else {
        slug
    }
}

/// Append `-2`, `-3`, … until the slug is absent from `existing`.
pub fn resolve_collision(base: &str, existing: &HashSet<String>) -> String {
    if !existing.contains(base) {
        return base.to_string();
    }
    let mut counter = 2u64;
    loop {
        let candidate = format!("{base}-{counter}");
        if !existing.contains(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// `[a-z0-9-]{1..50}`, no leading or trailing hyphens.
pub fn validate_slug(slug: &str) -> bool {
    if slug.is_empty() || slug.len() > MAX_SLUG_LEN {
        return false;
    }
    if slug.starts_with('-') || slug.ends_with('-') {
        return false;
    }
    slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
#[path = "slug_tests.rs"]
mod tests;
