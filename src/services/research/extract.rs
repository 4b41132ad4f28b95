//! Opportunistic Payload Extraction
//!
//! Best-effort enrichment pass over the raw text of each stream frame:
//! vulnerability identifiers, absolute URLs, and a trust-score figure.
//! The final synthesized report, not this layer, is the system of record
//! for these facts, so extraction degrades to "no matches" rather than
//! ever failing the stream.

use regex::Regex;

/// Matches pulled out of one frame.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Extracted {
    /// CVE identifiers, upper-cased
    pub cves: Vec<String>,
    /// Absolute URLs with trailing punctuation trimmed
    pub urls: Vec<String>,
    /// First plausible trust-score figure (0-100)
    pub trust_score: Option<u8>,
}

/// Pattern set compiled once per reconstructor.
pub struct PayloadExtractor {
    cve: Regex,
    url: Regex,
    score: Regex,
}

impl Default for PayloadExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PayloadExtractor {
    pub fn new() -> Self {
        Self {
            cve: Regex::new(r"(?i)CVE-\d{4}-\d{4,}").unwrap(),
            url: Regex::new(r#"https?://[^\s"'<>\\]+"#).unwrap(),
            // A "trust score" key with an integer within a short window,
            // tolerating snake_case, camelCase, and JSON quoting.
            score: Regex::new(r"(?i)trust[_\s-]?score\D{0,16}?(\d{1,3})").unwrap(),
        }
    }

    /// Scan one frame's raw text. Zero matches is the common case and is
    /// not an error.
    pub fn extract(&self, text: &str) -> Extracted {
        let mut extracted = Extracted::default();

        for m in self.cve.find_iter(text) {
            let id = m.as_str().to_uppercase();
            if !extracted.cves.contains(&id) {
                extracted.cves.push(id);
            }
        }

        for m in self.url.find_iter(text) {
            let url = m
                .as_str()
                .trim_end_matches(['.', ',', ';', ':', ')', ']', '}'])
                .to_string();
            if !extracted.urls.contains(&url) {
                extracted.urls.push(url);
            }
        }

        extracted.trust_score = self
            .score
            .captures_iter(text)
            .filter_map(|c| c.get(1))
            .filter_map(|m| m.as_str().parse::<u8>().ok())
            .find(|score| *score <= 100);

        extracted
    }
}
