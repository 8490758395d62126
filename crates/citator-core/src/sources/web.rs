//! Web reference sources.
//!
//! The free legal reference sites have no lookup API, so these sources issue
//! a site search and only trust the answer when the returned page actually
//! shows the citation being checked. The case name comes from the page
//! title, stripped of site branding.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use citation_types::VerificationCandidate;
use lazy_static::lazy_static;
use regex::Regex;

use super::{CitationSource, SourceError};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

lazy_static! {
    static ref TITLE_PATTERN: Regex = Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap();

    /// A trailing reporter citation in a page title, e.g.
    /// "Brown v. Board of Education, 347 U.S. 483 (1954)".
    static ref TITLE_TRAILING_CITE: Regex = Regex::new(r",\s*\d{1,4}\s+.*$").unwrap();

    static ref TITLE_TRAILING_PAREN: Regex = Regex::new(r"\s*\([^()]*\)\s*$").unwrap();

    static ref TITLE_YEAR: Regex = Regex::new(r"\b((?:1[6-9]|20)\d{2})\b").unwrap();
}

/// One search-driven reference site. The same code serves every site; only
/// the identifier, search endpoint, and query parameter differ.
pub struct WebReferenceSource {
    id: String,
    search_url: String,
    query_param: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl WebReferenceSource {
    pub fn new(
        id: impl Into<String>,
        search_url: impl Into<String>,
        query_param: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            search_url: search_url.into(),
            query_param: query_param.into(),
            timeout: DEFAULT_TIMEOUT,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn justia() -> Self {
        Self::new("justia", "https://law.justia.com/search", "q")
    }

    pub fn leagle() -> Self {
        Self::new("leagle", "https://www.leagle.com/search", "q")
    }

    pub fn findlaw() -> Self {
        Self::new("findlaw", "https://caselaw.findlaw.com/search", "query")
    }

    pub fn casetext() -> Self {
        Self::new("casetext", "https://casetext.com/search", "q")
    }

    /// The standard fallback chain, in priority order.
    pub fn default_chain() -> Vec<Arc<dyn CitationSource>> {
        vec![
            Arc::new(Self::justia()),
            Arc::new(Self::leagle()),
            Arc::new(Self::findlaw()),
            Arc::new(Self::casetext()),
        ]
    }
}

#[async_trait]
impl CitationSource for WebReferenceSource {
    fn source_id(&self) -> &str {
        &self.id
    }

    fn timeout(&self) -> Option<Duration> {
        Some(self.timeout)
    }

    async fn lookup(&self, citation: &str) -> Result<Vec<VerificationCandidate>, SourceError> {
        let response = self
            .client
            .get(&self.search_url)
            .query(&[(self.query_param.as_str(), citation)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::BadResponse(
                self.id.clone(),
                format!("HTTP {}", response.status()),
            ));
        }

        let final_url = response.url().to_string();
        let body = response.text().await?;

        if !page_mentions_citation(&body, citation) {
            return Err(SourceError::Mismatch(citation.to_string()));
        }

        let Some(title) = page_title(&body) else {
            return Ok(Vec::new());
        };
        let date = TITLE_YEAR
            .captures(&title)
            .map(|caps| caps[1].to_string());
        let case_name = clean_title(&title);
        if case_name.is_empty() {
            return Ok(Vec::new());
        }

        Ok(vec![VerificationCandidate {
            case_name,
            date,
            url: Some(final_url),
            source_id: self.id.clone(),
        }])
    }
}

/// The page must show the citation itself, whitespace differences aside.
/// A search page full of near misses does not count as verification.
fn page_mentions_citation(body: &str, citation: &str) -> bool {
    let pattern = citation
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    Regex::new(&pattern)
        .map(|re| re.is_match(body))
        .unwrap_or(false)
}

fn page_title(body: &str) -> Option<String> {
    TITLE_PATTERN
        .captures(body)
        .map(|caps| decode_entities(caps[1].trim()))
}

/// Drop site branding and the trailing citation/year a reference site puts
/// in its titles.
fn clean_title(title: &str) -> String {
    let mut name = title;
    for separator in [" | ", " :: ", " - "] {
        if let Some(idx) = name.find(separator) {
            name = &name[..idx];
        }
    }
    let name = TITLE_TRAILING_CITE.replace(name, "");
    let name = TITLE_TRAILING_PAREN.replace(&name, "");
    name.trim().to_string()
}

fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&quot;", "\"")
}
