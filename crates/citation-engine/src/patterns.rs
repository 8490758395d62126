//! Regex tables for citation recognition.
//!
//! Reporter patterns are generated from the registry in `reporters` so a new
//! series only needs a table entry, never a new regex.

use lazy_static::lazy_static;
use regex::Regex;

use crate::reporters::{Reporter, REPORTERS};

/// Regex fragment matching any spelling variant of one reporter, with
/// flexible internal whitespace.
fn variant_alternation(reporter: &Reporter) -> String {
    reporter
        .variants
        .iter()
        .map(|variant| regex::escape(variant).replace(' ', r"\s+"))
        .collect::<Vec<_>>()
        .join("|")
}

lazy_static! {
    /// One `<volume> <reporter> <page>` pattern per registry entry, in
    /// registry order (more specific series first).
    pub static ref REPORTER_PATTERNS: Vec<(&'static Reporter, Regex)> = REPORTERS
        .iter()
        .map(|reporter| {
            let pattern = format!(
                r"\b(\d{{1,4}})\s+(?:{})\s+(\d{{1,5}})\b",
                variant_alternation(reporter)
            );
            (reporter, Regex::new(&pattern).unwrap())
        })
        .collect();

    /// Unpublished Westlaw citations: "2019 WL 2516279".
    pub static ref WL_PATTERN: Regex =
        Regex::new(r"\b((?:19|20)\d{2})\s+WL\s+(\d{1,10})\b").unwrap();

    /// Docket numbers: "No. 12-345", "No. 3:19-cv-01234".
    pub static ref DOCKET_PATTERN: Regex = Regex::new(
        r"(?i)\bNos?\.\s*((?:\d{1,2}:)?\d{2,4}-(?:[A-Za-z]{1,5}-)?\d{1,6}(?:-[A-Za-z]{1,5}\d*)?)"
    )
    .unwrap();

    /// General citation grammar: volume, a run of abbreviation words with an
    /// optional series ordinal, then a page. Catches reporters missing from
    /// the registry; candidates are filtered against
    /// `NON_REPORTER_ABBREVIATIONS` before acceptance.
    pub static ref GRAMMAR_PATTERN: Regex = Regex::new(
        r"\b(\d{1,4})\s+((?:[A-Z][A-Za-z]{0,9}\.\s*)+(?:[234](?:d|th)\s+)?)(\d{1,5})\b"
    )
    .unwrap();

    /// A single long capitalized word, e.g. "Smith." out of "in 2019 Smith.
    /// 42": prose that the grammar scan must not mistake for a reporter.
    /// Genuine one-word reporters abbreviate short ("Haw.", "Mass.", "Tex.").
    pub static ref GRAMMAR_IMPLAUSIBLE: Regex = Regex::new(r"^[A-Z][a-z]{4,}\.$").unwrap();

    /// Trailing pinpoint page right after a citation: ", 716" or ", 716-18".
    pub static ref PINPOINT_AFTER: Regex =
        Regex::new(r"^\s*,\s*(\d{1,5})(?:\s*[-\u{2013}]\s*\d{1,5})?").unwrap();

    /// Text allowed between two citations of one citation-bearing clause:
    /// separators and pinpoint pages only.
    pub static ref GROUP_CONNECTOR: Regex = Regex::new(
        r"^[\s,;]*(?:(?:at\s+)?\d{1,5}(?:\s*[-\u{2013}]\s*\d{1,5})?[\s,;]*)*$"
    )
    .unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_patterns_match_spelling_variants() {
        let text = "State v. Johnson, 159 Wn.2d 700, 153 P.3d 846 (2007).";
        let washington = REPORTER_PATTERNS
            .iter()
            .find(|(r, _)| r.canonical == "Wash. 2d")
            .unwrap();
        let m = washington.1.find(text).expect("should match Wn.2d spelling");
        assert_eq!(m.as_str(), "159 Wn.2d 700");

        let pacific = REPORTER_PATTERNS
            .iter()
            .find(|(r, _)| r.canonical == "P.3d")
            .unwrap();
        assert_eq!(pacific.1.find(text).unwrap().as_str(), "153 P.3d 846");
    }

    #[test]
    fn test_us_reports_pattern_ignores_usc() {
        let us = REPORTER_PATTERNS
            .iter()
            .find(|(r, _)| r.canonical == "U.S.")
            .unwrap();
        assert!(us.1.find("42 U.S.C. \u{a7} 1983").is_none());
        assert_eq!(us.1.find("Brown, 347 U.S. 483 (1954)").unwrap().as_str(), "347 U.S. 483");
    }

    #[test]
    fn test_westlaw_and_docket_patterns() {
        let wl = WL_PATTERN.captures("State v. Smith, 2019 WL 2516279, at *3").unwrap();
        assert_eq!(&wl[1], "2019");
        assert_eq!(&wl[2], "2516279");

        let docket = DOCKET_PATTERN.captures("No. 3:19-cv-01234 (W.D. Wash.)").unwrap();
        assert_eq!(&docket[1], "3:19-cv-01234");
    }

    #[test]
    fn test_grammar_pattern_catches_unregistered_reporters() {
        let caps = GRAMMAR_PATTERN.captures("12 Haw. App. 345").unwrap();
        assert_eq!(&caps[1], "12");
        assert_eq!(caps[2].trim(), "Haw. App.");
        assert_eq!(&caps[3], "345");
    }

    #[test]
    fn test_group_connector_accepts_pinpoints_only() {
        assert!(GROUP_CONNECTOR.is_match(", "));
        assert!(GROUP_CONNECTOR.is_match(", 716, "));
        assert!(GROUP_CONNECTOR.is_match("; at 12, "));
        assert!(!GROUP_CONNECTOR.is_match(", and later in "));
    }
}
