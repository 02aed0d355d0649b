use async_trait::async_trait;
use regex::Regex;
use std::collections::BTreeMap;
use thiserror::Error;

use smsledger_core::MatchReport;

#[derive(Debug, Error)]
pub enum MatcherError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Matcher responded with status {0}")]
    Status(u16),
}

/// Runs a candidate pattern against sample message text.
///
/// A pattern that fails to compile is not an `Err`: it comes back as an
/// unsuccessful report with `details.error` set. `Err` is reserved for the
/// matcher itself being unreachable.
#[async_trait]
pub trait Matcher: Send + Sync {
    async fn test(&self, content: &str, pattern: &str) -> Result<MatchReport, MatcherError>;
}

/// In-process matcher: unanchored search, every named group reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexMatcher;

impl RegexMatcher {
    pub fn evaluate(content: &str, pattern: &str) -> MatchReport {
        let re = match Regex::new(pattern) {
            Ok(re) => re,
            Err(e) => return MatchReport::error(e.to_string()),
        };
        let Some(caps) = re.captures(content) else {
            return MatchReport::no_match();
        };

        let details: BTreeMap<String, Option<String>> = re
            .capture_names()
            .flatten()
            .map(|name| (name.to_string(), caps.name(name).map(|m| m.as_str().to_string())))
            .collect();
        MatchReport::matched(details)
    }
}

#[async_trait]
impl Matcher for RegexMatcher {
    async fn test(&self, content: &str, pattern: &str) -> Result<MatchReport, MatcherError> {
        Ok(Self::evaluate(content, pattern))
    }
}
