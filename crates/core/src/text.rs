//! Text helpers shared by the resolver and the fill strategies
//!
//! - [`normalize`]: canonical form used on both sides of every comparison
//! - underscore runs: manually drawn blanks such as `Name: ________`
//! - placeholder dashes: characters that mark a field as intentionally empty

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Characters that count as an "empty on purpose" cell or remainder.
pub const PLACEHOLDER_DASHES: [&str; 3] = ["\u{2014}", "-", "\u{2013}"];

/// Canonicalize text for comparison.
///
/// Applies NFC, lowercases, trims, and collapses every whitespace run
/// (spaces, tabs, newlines) into a single space.
pub fn normalize(text: &str) -> String {
    let composed: String = text.nfc().collect();
    composed
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether text is empty once surrounding whitespace is removed.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Whether the trimmed text is exactly one of [`PLACEHOLDER_DASHES`].
pub fn is_placeholder_dash(text: &str) -> bool {
    let trimmed = text.trim();
    PLACEHOLDER_DASHES.iter().any(|dash| *dash == trimmed)
}

fn underscore_regex() -> &'static Regex {
    static RUNS: OnceLock<Regex> = OnceLock::new();
    RUNS.get_or_init(|| Regex::new(r"_+").unwrap())
}

/// Byte range of the first run of at least `min_run` underscores.
pub fn find_underscore_run(text: &str, min_run: usize) -> Option<Range<usize>> {
    let min_run = min_run.max(1);
    underscore_regex()
        .find_iter(text)
        .find(|m| m.len() >= min_run)
        .map(|m| m.range())
}

pub fn has_underscore_run(text: &str, min_run: usize) -> bool {
    find_underscore_run(text, min_run).is_some()
}

/// Replace the first underscore run with `value`, leaving later runs alone.
///
/// Returns `None` when the text holds no run.
pub fn replace_underscore_run(text: &str, value: &str, min_run: usize) -> Option<String> {
    let run = find_underscore_run(text, min_run)?;
    let mut out = String::with_capacity(text.len() - run.len() + value.len());
    out.push_str(&text[..run.start]);
    out.push_str(value);
    out.push_str(&text[run.end..]);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lowercases_and_collapses() {
        assert_eq!(normalize("  Full\tName \n\n Here  "), "full name here");
    }

    #[test]
    fn test_normalize_empty_and_whitespace() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \t\n "), "");
    }

    #[test]
    fn test_normalize_idempotent() {
        for sample in [
            "  Дата   рождения:\t",
            "ALREADY normal",
            "a\u{0301}ccent",
            "Line\r\nBreak\u{00A0}nbsp",
            "",
        ] {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "sample {sample:?}");
        }
    }

    #[test]
    fn test_normalize_composes_decomposed_characters() {
        assert_eq!(normalize("Cafe\u{0301}"), normalize("Caf\u{00E9}"));
    }

    #[test]
    fn test_placeholder_dash() {
        assert!(is_placeholder_dash("\u{2014}"));
        assert!(is_placeholder_dash(" - "));
        assert!(is_placeholder_dash("\u{2013}"));
        assert!(!is_placeholder_dash("--"));
        assert!(!is_placeholder_dash(""));
    }

    #[test]
    fn test_find_underscore_run_requires_three() {
        assert_eq!(find_underscore_run("a __ b", 3), None);
        assert_eq!(find_underscore_run("a ___ b", 3), Some(2..5));
        assert_eq!(find_underscore_run("snake_case_name", 3), None);
    }

    #[test]
    fn test_replace_first_run_only() {
        let out = replace_underscore_run("From ____ to _____", "Monday", 3).unwrap();
        assert_eq!(out, "From Monday to _____");
    }

    #[test]
    fn test_replace_treats_value_literally() {
        let out = replace_underscore_run("Price: ___", "$1 and ${2}", 3).unwrap();
        assert_eq!(out, "Price: $1 and ${2}");
    }

    #[test]
    fn test_replace_without_run() {
        assert_eq!(replace_underscore_run("Name:", "x", 3), None);
    }

    #[test]
    fn test_custom_run_length() {
        assert!(has_underscore_run("a __ b", 2));
        assert!(!has_underscore_run("a ____ b", 5));
    }

    #[test]
    fn test_longer_run_found_after_short_ones() {
        assert_eq!(find_underscore_run("a __ b _____ c", 4), Some(7..12));
        let out = replace_underscore_run("a __ b _____ c", "v", 4).unwrap();
        assert_eq!(out, "a __ b v c");
    }

    #[test]
    fn test_huge_run_length_finds_nothing() {
        assert_eq!(find_underscore_run("a ___ b", 1_000_000), None);
        assert_eq!(replace_underscore_run("a ___ b", "x", usize::MAX), None);
    }
}
