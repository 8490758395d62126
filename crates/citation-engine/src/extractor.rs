//! Citation extraction.
//!
//! Two complementary strategies run over the text: the reporter pattern
//! table (registry series, Westlaw numbers, docket numbers) and the general
//! citation-grammar scan. Matches are merged span-wise, pinpoint pages are
//! attached, and citations separated only by clause punctuation are recorded
//! as one parallel group.

use citation_types::normalize::{collapse_whitespace, floor_char_boundary};
use citation_types::{Citation, ExtractionMethod, ProcessingConfig};

use crate::patterns::{
    DOCKET_PATTERN, GRAMMAR_IMPLAUSIBLE, GRAMMAR_PATTERN, GROUP_CONNECTOR, PINPOINT_AFTER,
    REPORTER_PATTERNS, WL_PATTERN,
};
use crate::reporters::{find_reporter, is_non_reporter};

/// Longest stretch of separator text that can still join two citations into
/// one parallel group.
const MAX_CONNECTOR_LEN: usize = 40;

/// How far past a citation to look for a trailing pinpoint page.
const PINPOINT_WINDOW: usize = 40;

struct RawMatch {
    start: usize,
    end: usize,
    normalized: String,
    reporter: Option<String>,
    volume: Option<u32>,
    page: Option<u32>,
    method: ExtractionMethod,
}

/// Find every citation in `text`, ordered by first occurrence. Total: no
/// matches is an empty vector, never an error.
pub fn extract_citations(text: &str, config: &ProcessingConfig) -> Vec<Citation> {
    let mut matches = Vec::new();
    if config.use_pattern_extractor {
        pattern_matches(text, &mut matches);
    }
    if config.use_library_extractor {
        grammar_matches(text, &mut matches);
    }

    let kept = merge_matches(matches);

    let mut citations: Vec<Citation> = kept
        .into_iter()
        .map(|m| Citation {
            raw_text: text[m.start..m.end].to_string(),
            normalized_text: m.normalized,
            start_offset: m.start,
            end_offset: m.end,
            extraction_method: m.method,
            reporter: m.reporter,
            volume: m.volume,
            page: m.page,
            ..Default::default()
        })
        .collect();

    assign_pinpoints(text, &mut citations);
    assign_parallel_groups(text, &mut citations);
    citations
}

// ============================================================================
// Strategy 1: reporter pattern table
// ============================================================================

fn pattern_matches(text: &str, out: &mut Vec<RawMatch>) {
    for (reporter, regex) in REPORTER_PATTERNS.iter() {
        for caps in regex.captures_iter(text) {
            let full = caps.get(0).unwrap();
            let volume = &caps[1];
            let page = &caps[2];
            out.push(RawMatch {
                start: full.start(),
                end: full.end(),
                normalized: format!("{} {} {}", volume, reporter.canonical, page),
                reporter: Some(reporter.canonical.to_string()),
                volume: volume.parse().ok(),
                page: page.parse().ok(),
                method: ExtractionMethod::Pattern,
            });
        }
    }

    for caps in WL_PATTERN.captures_iter(text) {
        let full = caps.get(0).unwrap();
        out.push(RawMatch {
            start: full.start(),
            end: full.end(),
            normalized: format!("{} WL {}", &caps[1], &caps[2]),
            reporter: Some("WL".to_string()),
            volume: caps[1].parse().ok(),
            page: caps[2].parse().ok(),
            method: ExtractionMethod::Pattern,
        });
    }

    for caps in DOCKET_PATTERN.captures_iter(text) {
        let full = caps.get(0).unwrap();
        out.push(RawMatch {
            start: full.start(),
            end: full.end(),
            normalized: format!("No. {}", &caps[1]),
            reporter: None,
            volume: None,
            page: None,
            method: ExtractionMethod::Pattern,
        });
    }
}

// ============================================================================
// Strategy 2: general citation grammar
// ============================================================================

fn grammar_matches(text: &str, out: &mut Vec<RawMatch>) {
    for caps in GRAMMAR_PATTERN.captures_iter(text) {
        let full = caps.get(0).unwrap();
        let reporter_raw = collapse_whitespace(caps[2].trim());
        if reporter_raw.len() > 20
            || is_non_reporter(&reporter_raw)
            || GRAMMAR_IMPLAUSIBLE.is_match(&reporter_raw)
        {
            continue;
        }

        let volume = &caps[1];
        let page = &caps[3];
        let (normalized, reporter) = match find_reporter(&reporter_raw) {
            Some(entry) => (
                format!("{} {} {}", volume, entry.canonical, page),
                entry.canonical.to_string(),
            ),
            None => (collapse_whitespace(full.as_str()), reporter_raw),
        };

        out.push(RawMatch {
            start: full.start(),
            end: full.end(),
            normalized,
            reporter: Some(reporter),
            volume: volume.parse().ok(),
            page: page.parse().ok(),
            method: ExtractionMethod::Grammar,
        });
    }
}

// ============================================================================
// Merging
// ============================================================================

/// Overlapping spans keep the earlier/longer match; identical spans collapse
/// to one citation with the pattern strategy preferred. Output is sorted by
/// start offset.
fn merge_matches(mut matches: Vec<RawMatch>) -> Vec<RawMatch> {
    matches.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then(b.end.cmp(&a.end))
            .then(method_rank(a.method).cmp(&method_rank(b.method)))
    });

    let mut kept: Vec<RawMatch> = Vec::new();
    for cand in matches {
        let overlaps = kept
            .iter()
            .any(|k| cand.start < k.end && k.start < cand.end);
        if !overlaps {
            kept.push(cand);
        }
    }
    kept
}

fn method_rank(method: ExtractionMethod) -> u8 {
    match method {
        ExtractionMethod::Pattern => 0,
        ExtractionMethod::Grammar => 1,
    }
}

// ============================================================================
// Post-passes: pinpoints and parallel groups
// ============================================================================

fn assign_pinpoints(text: &str, citations: &mut [Citation]) {
    for i in 0..citations.len() {
        let gap_end = if i + 1 < citations.len() {
            citations[i + 1].start_offset
        } else {
            floor_char_boundary(text, citations[i].end_offset + PINPOINT_WINDOW)
        };
        let gap = &text[citations[i].end_offset..gap_end];
        if let Some(caps) = PINPOINT_AFTER.captures(gap) {
            citations[i].pinpoint = caps[1].parse().ok();
        }
    }
}

fn assign_parallel_groups(text: &str, citations: &mut [Citation]) {
    let mut next_group = 0u32;
    for i in 1..citations.len() {
        let connector = &text[citations[i - 1].end_offset..citations[i].start_offset];
        if connector.len() > MAX_CONNECTOR_LEN || !GROUP_CONNECTOR.is_match(connector) {
            continue;
        }
        let group = match citations[i - 1].parallel_group {
            Some(g) => g,
            None => {
                let g = next_group;
                next_group += 1;
                citations[i - 1].parallel_group = Some(g);
                g
            }
        };
        citations[i].parallel_group = Some(group);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn all_strategies() -> ProcessingConfig {
        ProcessingConfig::default()
    }

    #[test]
    fn test_extracts_parallel_state_citations() {
        let text = "State v. Johnson, 159 Wn.2d 700, 153 P.3d 846 (2007).";
        let citations = extract_citations(text, &all_strategies());

        assert_eq!(citations.len(), 2);
        assert_eq!(citations[0].raw_text, "159 Wn.2d 700");
        assert_eq!(citations[0].normalized_text, "159 Wash. 2d 700");
        assert_eq!(citations[0].reporter.as_deref(), Some("Wash. 2d"));
        assert_eq!(citations[0].volume, Some(159));
        assert_eq!(citations[1].normalized_text, "153 P.3d 846");
        assert_eq!(
            citations[0].parallel_group, citations[1].parallel_group,
            "comma-adjacent citations share a group"
        );
        assert!(citations[0].parallel_group.is_some());
    }

    #[test]
    fn test_both_strategies_collapse_to_one_citation() {
        let text = "Brown v. Board of Education, 347 U.S. 483 (1954).";
        let citations = extract_citations(text, &all_strategies());

        assert_eq!(citations.len(), 1, "pattern and grammar hits on one span must dedupe");
        assert_eq!(citations[0].extraction_method, ExtractionMethod::Pattern);
        assert_eq!(citations[0].normalized_text, "347 U.S. 483");
    }

    #[test]
    fn test_pattern_only_and_grammar_only_configs() {
        let text = "See 12 Haw. App. 345 and 347 U.S. 483.";

        let mut pattern_only = all_strategies();
        pattern_only.use_library_extractor = false;
        let citations = extract_citations(text, &pattern_only);
        assert_eq!(citations.len(), 1);
        assert_eq!(citations[0].normalized_text, "347 U.S. 483");

        let mut grammar_only = all_strategies();
        grammar_only.use_pattern_extractor = false;
        let citations = extract_citations(text, &grammar_only);
        assert_eq!(citations.len(), 2);
        assert_eq!(citations[0].normalized_text, "12 Haw. App. 345");
        assert_eq!(citations[0].extraction_method, ExtractionMethod::Grammar);

        let mut nothing = all_strategies();
        nothing.use_pattern_extractor = false;
        nothing.use_library_extractor = false;
        assert!(extract_citations(text, &nothing).is_empty());
    }

    #[test]
    fn test_pinpoint_attaches_to_preceding_citation() {
        let text = "(quoting Bostain v. Food Express, Inc., 159 Wn.2d 700, 716, 153 P.3d 846 (2007))";
        let citations = extract_citations(text, &all_strategies());

        assert_eq!(citations.len(), 2);
        assert_eq!(citations[0].pinpoint, Some(716));
        assert_eq!(citations[1].pinpoint, None);
        assert_eq!(citations[0].parallel_group, citations[1].parallel_group);
    }

    #[test]
    fn test_statutes_are_not_case_citations() {
        let text = "Under 42 U.S.C. \u{a7} 1983 and 29 C.F.R. 1604.11, plaintiff claims...";
        let citations = extract_citations(text, &all_strategies());
        assert!(citations.is_empty(), "got {:?}", citations);
    }

    #[test]
    fn test_westlaw_and_docket_extraction() {
        let text = "State v. Ortiz, No. 3:19-cv-01234, 2019 WL 2516279, at *3 (W.D. Wash. 2019).";
        let citations = extract_citations(text, &all_strategies());

        let normalized: Vec<&str> = citations.iter().map(|c| c.normalized_text.as_str()).collect();
        assert!(normalized.contains(&"No. 3:19-cv-01234"), "got {:?}", normalized);
        assert!(normalized.contains(&"2019 WL 2516279"), "got {:?}", normalized);
    }

    #[test]
    fn test_output_is_in_first_occurrence_order() {
        let text = "See 410 U.S. 113; accord 347 U.S. 483; then 163 U.S. 537.";
        let citations = extract_citations(text, &all_strategies());
        let starts: Vec<usize> = citations.iter().map(|c| c.start_offset).collect();
        let mut sorted = starts.clone();
        sorted.sort_unstable();
        assert_eq!(starts, sorted);
        assert_eq!(citations[0].normalized_text, "410 U.S. 113");
    }

    #[test]
    fn test_distant_citations_get_no_shared_group() {
        let text = format!(
            "First 347 U.S. 483 here.{}Then 410 U.S. 113 there.",
            " filler sentence ".repeat(5)
        );
        let citations = extract_citations(&text, &all_strategies());
        assert_eq!(citations.len(), 2);
        assert!(citations[0].parallel_group.is_none());
        assert!(citations[1].parallel_group.is_none());
    }

    proptest! {
        #[test]
        fn prop_extraction_is_total_and_ordered(text in "\\PC{0,300}") {
            let citations = extract_citations(&text, &ProcessingConfig::default());
            let mut last_start = 0usize;
            for c in &citations {
                prop_assert!(c.start_offset < c.end_offset);
                prop_assert!(c.end_offset <= text.len());
                prop_assert!(c.start_offset >= last_start);
                prop_assert_eq!(&text[c.start_offset..c.end_offset], c.raw_text.as_str());
                last_start = c.start_offset;
            }
        }

        #[test]
        fn prop_no_two_citations_overlap(text in "[ -~]{0,200}") {
            let citations = extract_citations(&text, &ProcessingConfig::default());
            for pair in citations.windows(2) {
                prop_assert!(pair[0].end_offset <= pair[1].start_offset);
            }
        }
    }
}
