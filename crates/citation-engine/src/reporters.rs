//! Reporter registry: canonical series abbreviations and the spelling
//! variants that map to them.
//!
//! Downstream stages compare citations by canonical series, so "159 Wn.2d
//! 700" and "159 Wash. 2d 700" normalize to the same citation. Series are
//! deliberately kept distinct (F.2d and F.3d are separate series): parallel
//! citations never pair two volumes of one series, and the clusterer relies
//! on that to reject false merges.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReporterKind {
    Federal,
    Regional,
    State,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reporter {
    /// Canonical (Bluebook) series abbreviation.
    pub canonical: &'static str,
    /// Accepted source spellings, canonical included.
    pub variants: &'static [&'static str],
    pub kind: ReporterKind,
}

/// Registry of recognized reporter series. Within one family prefix the more
/// specific series comes first so generated patterns prefer the longer form.
pub const REPORTERS: &[Reporter] = &[
    // United States Supreme Court
    Reporter { canonical: "U.S.", variants: &["U.S.", "U. S."], kind: ReporterKind::Federal },
    Reporter { canonical: "S. Ct.", variants: &["S. Ct.", "S.Ct.", "Sup. Ct."], kind: ReporterKind::Federal },
    Reporter { canonical: "L. Ed. 2d", variants: &["L. Ed. 2d", "L.Ed.2d", "L. Ed.2d", "L.Ed. 2d"], kind: ReporterKind::Federal },
    Reporter { canonical: "L. Ed.", variants: &["L. Ed.", "L.Ed."], kind: ReporterKind::Federal },
    // Federal appellate and district courts
    Reporter { canonical: "F.4th", variants: &["F.4th", "F. 4th"], kind: ReporterKind::Federal },
    Reporter { canonical: "F.3d", variants: &["F.3d", "F. 3d"], kind: ReporterKind::Federal },
    Reporter { canonical: "F.2d", variants: &["F.2d", "F. 2d"], kind: ReporterKind::Federal },
    Reporter { canonical: "F. Supp. 3d", variants: &["F. Supp. 3d", "F.Supp.3d", "F. Supp.3d"], kind: ReporterKind::Federal },
    Reporter { canonical: "F. Supp. 2d", variants: &["F. Supp. 2d", "F.Supp.2d", "F. Supp.2d"], kind: ReporterKind::Federal },
    Reporter { canonical: "F. Supp.", variants: &["F. Supp.", "F.Supp."], kind: ReporterKind::Federal },
    Reporter { canonical: "F.R.D.", variants: &["F.R.D.", "F.R.D"], kind: ReporterKind::Federal },
    Reporter { canonical: "F.", variants: &["F."], kind: ReporterKind::Federal },
    Reporter { canonical: "B.R.", variants: &["B.R.", "B. R."], kind: ReporterKind::Federal },
    // Regional reporters
    Reporter { canonical: "A.3d", variants: &["A.3d", "A. 3d"], kind: ReporterKind::Regional },
    Reporter { canonical: "A.2d", variants: &["A.2d", "A. 2d"], kind: ReporterKind::Regional },
    Reporter { canonical: "A.", variants: &["A."], kind: ReporterKind::Regional },
    Reporter { canonical: "P.3d", variants: &["P.3d", "P. 3d"], kind: ReporterKind::Regional },
    Reporter { canonical: "P.2d", variants: &["P.2d", "P. 2d"], kind: ReporterKind::Regional },
    Reporter { canonical: "P.", variants: &["P."], kind: ReporterKind::Regional },
    Reporter { canonical: "N.E.3d", variants: &["N.E.3d", "N.E. 3d"], kind: ReporterKind::Regional },
    Reporter { canonical: "N.E.2d", variants: &["N.E.2d", "N.E. 2d"], kind: ReporterKind::Regional },
    Reporter { canonical: "N.E.", variants: &["N.E."], kind: ReporterKind::Regional },
    Reporter { canonical: "N.W.2d", variants: &["N.W.2d", "N.W. 2d"], kind: ReporterKind::Regional },
    Reporter { canonical: "N.W.", variants: &["N.W."], kind: ReporterKind::Regional },
    Reporter { canonical: "S.E.2d", variants: &["S.E.2d", "S.E. 2d"], kind: ReporterKind::Regional },
    Reporter { canonical: "S.E.", variants: &["S.E."], kind: ReporterKind::Regional },
    Reporter { canonical: "S.W.3d", variants: &["S.W.3d", "S.W. 3d"], kind: ReporterKind::Regional },
    Reporter { canonical: "S.W.2d", variants: &["S.W.2d", "S.W. 2d"], kind: ReporterKind::Regional },
    Reporter { canonical: "S.W.", variants: &["S.W."], kind: ReporterKind::Regional },
    Reporter { canonical: "So. 3d", variants: &["So. 3d", "So.3d"], kind: ReporterKind::Regional },
    Reporter { canonical: "So. 2d", variants: &["So. 2d", "So.2d"], kind: ReporterKind::Regional },
    Reporter { canonical: "So.", variants: &["So."], kind: ReporterKind::Regional },
    // State official reporters
    Reporter { canonical: "Wash. 2d", variants: &["Wash. 2d", "Wash.2d", "Wn.2d", "Wn. 2d"], kind: ReporterKind::State },
    Reporter { canonical: "Wash. App.", variants: &["Wash. App.", "Wn. App.", "Wn.App."], kind: ReporterKind::State },
    Reporter { canonical: "Wash.", variants: &["Wash.", "Wn."], kind: ReporterKind::State },
    Reporter { canonical: "Cal. 4th", variants: &["Cal. 4th", "Cal.4th"], kind: ReporterKind::State },
    Reporter { canonical: "Cal. 3d", variants: &["Cal. 3d", "Cal.3d"], kind: ReporterKind::State },
    Reporter { canonical: "Cal.", variants: &["Cal."], kind: ReporterKind::State },
    Reporter { canonical: "Cal. Rptr. 3d", variants: &["Cal. Rptr. 3d", "Cal.Rptr.3d"], kind: ReporterKind::State },
    Reporter { canonical: "Cal. Rptr. 2d", variants: &["Cal. Rptr. 2d", "Cal.Rptr.2d"], kind: ReporterKind::State },
    Reporter { canonical: "N.Y.3d", variants: &["N.Y.3d", "N.Y. 3d"], kind: ReporterKind::State },
    Reporter { canonical: "N.Y.2d", variants: &["N.Y.2d", "N.Y. 2d"], kind: ReporterKind::State },
    Reporter { canonical: "N.Y.", variants: &["N.Y."], kind: ReporterKind::State },
    Reporter { canonical: "N.Y.S.2d", variants: &["N.Y.S.2d", "N.Y.S. 2d"], kind: ReporterKind::State },
    Reporter { canonical: "Ill. 2d", variants: &["Ill. 2d", "Ill.2d"], kind: ReporterKind::State },
    Reporter { canonical: "Ill.", variants: &["Ill."], kind: ReporterKind::State },
    Reporter { canonical: "Ohio St. 3d", variants: &["Ohio St. 3d", "Ohio St.3d"], kind: ReporterKind::State },
    Reporter { canonical: "Ohio St.", variants: &["Ohio St."], kind: ReporterKind::State },
    Reporter { canonical: "Mass.", variants: &["Mass."], kind: ReporterKind::State },
    Reporter { canonical: "Tex.", variants: &["Tex."], kind: ReporterKind::State },
];

/// Abbreviations the grammar scan must never treat as a case reporter.
/// Statutory and regulatory cites share the `<number> <abbrev> <number>`
/// shape but are out of scope.
pub const NON_REPORTER_ABBREVIATIONS: &[&str] = &[
    "U.S.C.",
    "U.S.C.A.",
    "U.S.C.S.",
    "C.F.R.",
    "Stat.",
    "Pub. L.",
    "Fed. Reg.",
    "Sec.",
    "Art.",
    "Ch.",
    "No.",
    "Vol.",
    "Pt.",
    "Tit.",
    "Ex.",
    "Fig.",
    "Id.",
    "Mr.",
    "Mrs.",
    "Dr.",
    "St.",
    "Ave.",
    "Dept.",
];

/// Look up the registry entry for a source spelling, whitespace-collapsed.
pub fn find_reporter(spelling: &str) -> Option<&'static Reporter> {
    let collapsed = citation_types::normalize::collapse_whitespace(spelling);
    REPORTERS
        .iter()
        .find(|reporter| reporter.variants.iter().any(|v| *v == collapsed))
}

pub fn is_non_reporter(spelling: &str) -> bool {
    let collapsed = citation_types::normalize::collapse_whitespace(spelling);
    NON_REPORTER_ABBREVIATIONS.iter().any(|abbr| *abbr == collapsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_washington_variants_share_a_canonical_series() {
        let canonical: Vec<&str> = ["Wn.2d", "Wn. 2d", "Wash. 2d", "Wash.2d"]
            .iter()
            .map(|v| find_reporter(v).expect("variant should be registered").canonical)
            .collect();
        assert!(canonical.iter().all(|c| *c == "Wash. 2d"), "got {:?}", canonical);
    }

    #[test]
    fn test_series_stay_distinct() {
        let f3d = find_reporter("F.3d").unwrap();
        let f2d = find_reporter("F.2d").unwrap();
        assert_ne!(f3d.canonical, f2d.canonical);
    }

    #[test]
    fn test_statute_abbreviations_are_rejected() {
        assert!(is_non_reporter("U.S.C."));
        assert!(is_non_reporter("C.F.R."));
        assert!(!is_non_reporter("U.S."));
    }

    #[test]
    fn test_variant_lookup_collapses_whitespace() {
        assert_eq!(find_reporter("L. Ed.  2d").unwrap().canonical, "L. Ed. 2d");
        assert!(find_reporter("Nonsense Rptr.").is_none());
    }
}
