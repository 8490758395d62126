//! Case-name normalization shared by the clusterer (merge keys) and the
//! verifier (candidate disambiguation).

use std::collections::HashSet;

/// Collapse runs of whitespace to single spaces and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Largest char boundary at or below `index`, so window arithmetic on byte
/// offsets can never slice through a multi-byte character.
pub fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut i = index.min(text.len());
    while i > 0 && !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Normalize a case name for comparison: lowercase, punctuation dropped,
/// `&` spelled out, `vs`/`vs.` folded to `v`.
///
/// "State v. Johnson", "STATE VS JOHNSON" and "State v Johnson" all map to
/// "state v johnson".
pub fn normalize_case_name(name: &str) -> String {
    let mut cleaned = String::with_capacity(name.len() + 8);
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            // to_lowercase can expand into combining marks, which are not
            // alphanumeric themselves and would shift on a second pass
            cleaned.extend(ch.to_lowercase().filter(|c| c.is_alphanumeric()));
        } else if ch == '&' {
            cleaned.push_str(" and ");
        } else if ch == '\'' {
            // joins "Ass'n" into one token rather than splitting it
        } else {
            cleaned.push(' ');
        }
    }
    cleaned
        .split_whitespace()
        .map(|token| if token == "vs" { "v" } else { token })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalized name tokens, with the `v` connective excluded so it does not
/// inflate similarity between unrelated adversarial captions.
pub fn name_tokens(name: &str) -> HashSet<String> {
    normalize_case_name(name)
        .split_whitespace()
        .filter(|token| *token != "v")
        .map(|token| token.to_string())
        .collect()
}

/// Token-set Jaccard similarity between two case names, in [0.0, 1.0].
/// Two empty names are considered identical.
pub fn name_similarity(a: &str, b: &str) -> f64 {
    let tokens_a = name_tokens(a);
    let tokens_b = name_tokens(b);

    if tokens_a.is_empty() && tokens_b.is_empty() {
        return 1.0;
    }
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection = tokens_a.intersection(&tokens_b).count();
    let union = tokens_a.union(&tokens_b).count();
    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_folds_typography() {
        assert_eq!(normalize_case_name("State v. Johnson"), "state v johnson");
        assert_eq!(normalize_case_name("STATE VS JOHNSON"), "state v johnson");
        assert_eq!(
            normalize_case_name("Bostain v. Food Express, Inc."),
            "bostain v food express inc"
        );
        assert_eq!(
            normalize_case_name("Smith & Jones v. Albany"),
            "smith and jones v albany"
        );
        assert_eq!(
            normalize_case_name("Friedrichs v. Cal. Teachers Ass'n"),
            "friedrichs v cal teachers assn"
        );
    }

    #[test]
    fn test_identical_names_score_one() {
        assert!((name_similarity("Luis v. United States", "LUIS v UNITED STATES") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_unrelated_names_score_low() {
        let score = name_similarity("Luis v. United States", "Friedrichs v. Cal. Teachers Ass'n");
        assert!(score < 0.2, "expected near-zero similarity, got {}", score);
    }

    #[test]
    fn test_empty_names() {
        assert!((name_similarity("", "") - 1.0).abs() < 1e-9);
        assert!((name_similarity("Roe v. Wade", "") - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_word_order_does_not_matter() {
        let score = name_similarity("In re Marriage of Smith", "Marriage of Smith, In re");
        assert!((score - 1.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(name in ".{0,80}") {
            let once = normalize_case_name(&name);
            let twice = normalize_case_name(&once);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_similarity_is_symmetric_and_bounded(a in ".{0,40}", b in ".{0,40}") {
            let ab = name_similarity(&a, &b);
            let ba = name_similarity(&b, &a);
            prop_assert!((ab - ba).abs() < 1e-9);
            prop_assert!((0.0..=1.0).contains(&ab));
        }
    }
}
