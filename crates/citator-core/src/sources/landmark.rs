//! Built-in landmark case table.
//!
//! A small offline authority covering the citations briefs quote most. Lets
//! the pipeline verify famous cases without network access and gives tests
//! a real source with stable answers.

use std::collections::HashMap;

use async_trait::async_trait;
use citation_types::VerificationCandidate;

use super::{CitationSource, SourceError};

struct LandmarkCase {
    citation: &'static str,
    case_name: &'static str,
    year: &'static str,
    url: &'static str,
}

const LANDMARK_CASES: &[LandmarkCase] = &[
    LandmarkCase {
        citation: "5 U.S. 137",
        case_name: "Marbury v. Madison",
        year: "1803",
        url: "https://supreme.justia.com/cases/federal/us/5/137/",
    },
    LandmarkCase {
        citation: "163 U.S. 537",
        case_name: "Plessy v. Ferguson",
        year: "1896",
        url: "https://supreme.justia.com/cases/federal/us/163/537/",
    },
    LandmarkCase {
        citation: "304 U.S. 64",
        case_name: "Erie Railroad Co. v. Tompkins",
        year: "1938",
        url: "https://supreme.justia.com/cases/federal/us/304/64/",
    },
    LandmarkCase {
        citation: "347 U.S. 483",
        case_name: "Brown v. Board of Education",
        year: "1954",
        url: "https://supreme.justia.com/cases/federal/us/347/483/",
    },
    LandmarkCase {
        citation: "369 U.S. 186",
        case_name: "Baker v. Carr",
        year: "1962",
        url: "https://supreme.justia.com/cases/federal/us/369/186/",
    },
    LandmarkCase {
        citation: "376 U.S. 254",
        case_name: "New York Times Co. v. Sullivan",
        year: "1964",
        url: "https://supreme.justia.com/cases/federal/us/376/254/",
    },
    LandmarkCase {
        citation: "384 U.S. 436",
        case_name: "Miranda v. Arizona",
        year: "1966",
        url: "https://supreme.justia.com/cases/federal/us/384/436/",
    },
    LandmarkCase {
        citation: "86 S. Ct. 1602",
        case_name: "Miranda v. Arizona",
        year: "1966",
        url: "https://supreme.justia.com/cases/federal/us/384/436/",
    },
    LandmarkCase {
        citation: "388 U.S. 1",
        case_name: "Loving v. Virginia",
        year: "1967",
        url: "https://supreme.justia.com/cases/federal/us/388/1/",
    },
    LandmarkCase {
        citation: "410 U.S. 113",
        case_name: "Roe v. Wade",
        year: "1973",
        url: "https://supreme.justia.com/cases/federal/us/410/113/",
    },
    LandmarkCase {
        citation: "93 S. Ct. 705",
        case_name: "Roe v. Wade",
        year: "1973",
        url: "https://supreme.justia.com/cases/federal/us/410/113/",
    },
    LandmarkCase {
        citation: "418 U.S. 683",
        case_name: "United States v. Nixon",
        year: "1974",
        url: "https://supreme.justia.com/cases/federal/us/418/683/",
    },
    LandmarkCase {
        citation: "531 U.S. 98",
        case_name: "Bush v. Gore",
        year: "2000",
        url: "https://supreme.justia.com/cases/federal/us/531/98/",
    },
    LandmarkCase {
        citation: "539 U.S. 558",
        case_name: "Lawrence v. Texas",
        year: "2003",
        url: "https://supreme.justia.com/cases/federal/us/539/558/",
    },
    LandmarkCase {
        citation: "554 U.S. 570",
        case_name: "District of Columbia v. Heller",
        year: "2008",
        url: "https://supreme.justia.com/cases/federal/us/554/570/",
    },
    LandmarkCase {
        citation: "576 U.S. 644",
        case_name: "Obergefell v. Hodges",
        year: "2015",
        url: "https://supreme.justia.com/cases/federal/us/576/644/",
    },
];

pub struct LandmarkSource {
    cases: HashMap<&'static str, &'static LandmarkCase>,
}

impl LandmarkSource {
    pub fn new() -> Self {
        let cases = LANDMARK_CASES
            .iter()
            .map(|case| (case.citation, case))
            .collect();
        Self { cases }
    }
}

impl Default for LandmarkSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CitationSource for LandmarkSource {
    fn source_id(&self) -> &str {
        "landmark"
    }

    async fn lookup(&self, citation: &str) -> Result<Vec<VerificationCandidate>, SourceError> {
        Ok(self
            .cases
            .get(citation)
            .map(|case| {
                vec![VerificationCandidate {
                    case_name: case.case_name.to_string(),
                    date: Some(case.year.to_string()),
                    url: Some(case.url.to_string()),
                    source_id: "landmark".to_string(),
                }]
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_known_citation_resolves() {
        let source = LandmarkSource::new();
        let candidates = source.lookup("347 U.S. 483").await.unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].case_name, "Brown v. Board of Education");
        assert_eq!(candidates[0].date.as_deref(), Some("1954"));
    }

    #[tokio::test]
    async fn test_parallel_reporters_agree() {
        let source = LandmarkSource::new();
        let us = source.lookup("384 U.S. 436").await.unwrap();
        let sct = source.lookup("86 S. Ct. 1602").await.unwrap();
        assert_eq!(us[0].case_name, sct[0].case_name);
        assert_eq!(us[0].url, sct[0].url);
    }

    #[tokio::test]
    async fn test_unknown_citation_is_a_miss() {
        let source = LandmarkSource::new();
        assert!(source.lookup("1 F.3d 1").await.unwrap().is_empty());
    }
}
