//! Case name and year attribution.
//!
//! A citation's case name lives in the prose immediately before it; the year
//! usually trails the citation group in parentheses. Both searches are
//! windowed and total: finding nothing is a valid outcome, never an error.

use citation_types::normalize::{collapse_whitespace, floor_char_boundary};
use citation_types::Citation;
use lazy_static::lazy_static;
use regex::Regex;

/// How far before a citation to look for its case name.
const NAME_WINDOW: usize = 250;

/// How far past a citation group to look for its year.
const YEAR_WINDOW: usize = 120;

const MIN_NAME_LEN: usize = 5;
const MAX_NAME_LEN: usize = 120;

/// Signal phrases introducing a quoted or cited authority. Stripped from the
/// front of a candidate so a nested quotation attributes to the inner case,
/// not the outer sentence. Longest first.
const SIGNAL_PHRASES: &[&str] = &[
    "as explained in",
    "as stated in",
    "as held in",
    "see, e.g.,",
    "but see",
    "see also",
    "quoting",
    "citing",
    "compare",
    "contra",
    "accord",
    "e.g.,",
    "i.e.,",
    "e.g.",
    "i.e.",
    "cf.",
    "see",
];

/// Sentence-leading prose words that a greedy party match can swallow,
/// e.g. "Under Smith v. Jones". Never stripped from a procedural marker.
const LEADING_NOISE_WORDS: &[&str] = &[
    "in", "on", "at", "by", "from", "under", "after", "before", "when", "while", "since",
    "because", "although", "though", "unlike", "like", "against", "following", "applying",
    "overruling", "distinguishing", "thus", "then", "but", "and", "or", "so", "yet", "however",
    "accordingly", "also", "as",
];

/// Connectives that may not dangle at the end of a case name.
const TRAILING_DANGLERS: &[&str] = &["and", "or", "of", "the", "for", "&", "v", "v.", "vs."];

/// One adversarial party: a capitalized word, up to seven extension words
/// (further capitalized words, list connectives, "ex rel.", "et al."), and an
/// optional corporate suffix that may carry its own comma.
const PARTY: &str = r"[A-Z][A-Za-z0-9.'\-]*(?:\s+(?:[A-Z][A-Za-z0-9.'\-]*|&|of|the|and|for|ex\s+rel\.?|et\s+al\.?)){0,7}(?:,?\s+(?:Inc|Corp|Co|LLC|L\.L\.C|Ltd|L\.P|P\.C|N\.A)\.?)?";

lazy_static! {
    /// "Party v. Party" captions, "vs." tolerated.
    static ref ADVERSARY_PATTERN: Regex =
        Regex::new(&format!(r"{0}\s+v(?:s)?\.?\s+{0}", PARTY)).unwrap();

    /// Procedural captions: "In re X", "Ex parte X", "In the Matter of X",
    /// "Estate of X". Longest marker first so the alternation prefers it.
    static ref PROCEDURAL_PATTERN: Regex = Regex::new(&format!(
        r"\b(In\s+[Rr]e\s+the\s+Marriage\s+of|In\s+the\s+Matter\s+of|In\s+[Rr]e|Matter\s+of|Ex\s+[Pp]arte|Estate\s+of)\s+{0}",
        PARTY
    ))
    .unwrap();

    /// A word that ended the previous sentence, "Smith." but not "Wash.",
    /// "St." or "U.S.": capitalized, four or more lowercase letters, terminal
    /// period. Same shape test the grammar scan uses to reject prose.
    static ref SENTENCE_TERMINAL: Regex = Regex::new(r"^[A-Z][a-z]{4,}\.$").unwrap();

    /// A year inside parentheses, with optional court/date prefix:
    /// "(2007)", "(9th Cir. 2015)", "(Mar. 3, 2016)".
    static ref PAREN_YEAR: Regex =
        Regex::new(r"\(([^()]{0,40}?)((?:1[6-9]|20)\d{2})\)").unwrap();

    static ref BARE_YEAR: Regex = Regex::new(r"\b((?:1[6-9]|20)\d{2})\b").unwrap();

    /// Tokens the year scan may step over: pinpoints, "at", reporter-ish
    /// abbreviations, ordinals, short court/status words.
    static ref YEAR_SKIP_TOKEN: Regex = Regex::new(
        r"^(?:at|and|&|n|en|banc|per|curiam|slip|op|aff'd|rev'd|denied|amended|\d{1,5}(?:[-\u{2013}]\d{1,5})?|\d{1,2}(?:st|d|th)|[A-Z][A-Za-z.\d]{0,11})$"
    )
    .unwrap();
}

/// Which caption family produced an attributed name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamePattern {
    Adversary,
    InRe,
    MatterOf,
    ExParte,
    EstateOf,
}

/// Attribution outcome for one citation.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribution {
    pub case_name: Option<String>,
    pub year: Option<String>,
    pub confidence: f64,
    pub method: Option<NamePattern>,
}

struct Candidate {
    name: String,
    end: usize, // window-relative end of the raw match
    method: NamePattern,
}

/// Attribute a case name and year to `citation` from its surrounding text.
pub fn attribute_citation(text: &str, citation: &Citation) -> Attribution {
    let window_start = floor_char_boundary(text, citation.start_offset.saturating_sub(NAME_WINDOW));
    let window = &text[window_start..citation.start_offset];

    let best = find_case_name(window);
    let year = find_year(text, citation);

    match best {
        Some(candidate) => {
            let distance = window.len() - candidate.end;
            let base = match candidate.method {
                NamePattern::Adversary => 0.9,
                _ => 0.85,
            };
            let penalty = (distance as f64 / NAME_WINDOW as f64) * 0.4;
            Attribution {
                case_name: Some(candidate.name),
                year,
                confidence: (base - penalty).max(0.1),
                method: Some(candidate.method),
            }
        }
        None => Attribution {
            case_name: None,
            year,
            confidence: 0.0,
            method: None,
        },
    }
}

// ============================================================================
// Case name search
// ============================================================================

/// All valid caption candidates in the window; the one ending closest to the
/// citation wins, longer name breaking ties.
fn find_case_name(window: &str) -> Option<Candidate> {
    let mut candidates: Vec<Candidate> = Vec::new();

    for m in ADVERSARY_PATTERN.find_iter(window) {
        push_candidate(&mut candidates, m.as_str(), m.end(), NamePattern::Adversary);
    }
    for caps in PROCEDURAL_PATTERN.captures_iter(window) {
        let m = caps.get(0).unwrap();
        let method = match &caps[1] {
            marker if marker.starts_with("Ex") => NamePattern::ExParte,
            marker if marker.starts_with("Estate") => NamePattern::EstateOf,
            marker if marker.contains("Matter") => NamePattern::MatterOf,
            _ => NamePattern::InRe,
        };
        push_candidate(&mut candidates, m.as_str(), m.end(), method);
    }

    candidates.into_iter().max_by(|a, b| {
        a.end
            .cmp(&b.end)
            .then(a.name.len().cmp(&b.name.len()))
    })
}

fn push_candidate(candidates: &mut Vec<Candidate>, raw: &str, end: usize, method: NamePattern) {
    let name = clean_candidate(raw);
    if is_valid_candidate(&name) {
        candidates.push(Candidate { name, end, method });
    }
}

/// Strip leading signal phrases and swallowed prose words, then trailing
/// separators and dangling connectives.
fn clean_candidate(raw: &str) -> String {
    let mut name = collapse_whitespace(raw);

    'strip: loop {
        let lower = name.to_lowercase();

        for phrase in SIGNAL_PHRASES {
            // Boundary check so "Seeger" is not eaten by "see".
            if lower.starts_with(phrase) && name[phrase.len()..].starts_with([' ', ',']) {
                let rest = name[phrase.len()..].trim_start_matches([' ', ',']);
                if !rest.is_empty() {
                    name = rest.to_string();
                    continue 'strip;
                }
            }
        }

        if !starts_with_procedural_marker(&name) {
            if let Some(first) = name.split_whitespace().next() {
                let first_lower = first.to_lowercase();
                if LEADING_NOISE_WORDS.contains(&first_lower.as_str()) {
                    name = name[first.len()..].trim_start().to_string();
                    continue 'strip;
                }
                // "We follow Smith. Jones v. Baker": the tail of the prior
                // sentence bleeds into a greedy party match.
                if SENTENCE_TERMINAL.is_match(first) {
                    name = name[first.len()..].trim_start().to_string();
                    continue 'strip;
                }
            }
        }

        break;
    }

    let mut name = name.trim_end_matches([' ', ',', ';']).to_string();
    loop {
        let Some(last) = name.split_whitespace().last() else { break };
        if TRAILING_DANGLERS.contains(&last.to_lowercase().as_str()) {
            name.truncate(name.len() - last.len());
            name = name.trim_end().to_string();
        } else {
            break;
        }
    }
    name
}

fn starts_with_procedural_marker(name: &str) -> bool {
    let lower = name.to_lowercase();
    ["in re", "in the matter of", "matter of", "ex parte", "estate of"]
        .iter()
        .any(|marker| lower.starts_with(marker))
}

/// Contamination filter: a candidate must be inside the length bounds, start
/// like a caption, and carry a recognized case-name marker.
fn is_valid_candidate(name: &str) -> bool {
    if name.len() < MIN_NAME_LEN || name.len() > MAX_NAME_LEN {
        return false;
    }
    let Some(first) = name.chars().next() else { return false };
    if !first.is_uppercase() {
        return false;
    }
    has_adversary_marker(name) || starts_with_procedural_marker(name)
}

fn has_adversary_marker(name: &str) -> bool {
    let lower = format!(" {} ", name.to_lowercase());
    lower.contains(" v. ") || lower.contains(" v ") || lower.contains(" vs. ") || lower.contains(" vs ")
}

// ============================================================================
// Year search
// ============================================================================

/// Scan forward from the citation for its decision year. Everything between
/// the citation and the year must be part of the same citation group:
/// pinpoints, parallel citation tokens, court parentheticals.
fn find_year(text: &str, citation: &Citation) -> Option<String> {
    let window_end = floor_char_boundary(text, citation.end_offset + YEAR_WINDOW);
    let window = &text[citation.end_offset..window_end];

    if let Some(caps) = PAREN_YEAR.captures(window) {
        let full = caps.get(0).unwrap();
        if prefix_is_skippable(&window[..full.start()]) {
            return Some(caps[2].to_string());
        }
    }

    if let Some(m) = BARE_YEAR.find(window) {
        if prefix_is_skippable(&window[..m.start()]) {
            return Some(m.as_str().to_string());
        }
    }

    None
}

fn prefix_is_skippable(prefix: &str) -> bool {
    prefix.split_whitespace().all(|raw| {
        let token =
            raw.trim_matches(|c| matches!(c, ',' | ';' | '.' | '(' | ')' | '[' | ']' | '*'));
        token.is_empty() || YEAR_SKIP_TOKEN.is_match(token)
    })
}
