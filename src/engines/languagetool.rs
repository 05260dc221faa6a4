// LanguageTool grammar checking
// Talks to a LanguageTool HTTP server (`/v2/check`) and counts the reported matches.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::error::{Result, ScoutError};
use super::GrammarChecker;

#[derive(Debug, Deserialize)]
struct CheckResponse {
    matches: Vec<CheckMatch>,
}

#[derive(Debug, Deserialize)]
struct CheckMatch {
    #[serde(default)]
    message: String,
    rule: Option<CheckRule>,
}

#[derive(Debug, Deserialize)]
struct CheckRule {
    id: String,
}

/// Client for a LanguageTool server.
///
/// Thread-safe: the underlying HTTP client pools connections and may be shared;
/// the server handles concurrent checks itself.
#[derive(Debug, Clone)]
pub struct LanguageToolClient {
    base_url: String,
    language: String,
    client: Client,
}

impl LanguageToolClient {
    pub fn new(base_url: &str, language: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ScoutError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            language: language.to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check that the server answers its language listing
    pub fn is_available(&self) -> bool {
        self.client
            .get(format!("{}/v2/languages", self.base_url))
            .send()
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }
}

impl GrammarChecker for LanguageToolClient {
    fn check_grammar(&self, text: &str) -> Result<u32> {
        if text.trim().is_empty() {
            return Ok(0);
        }

        let response = self.client
            .post(format!("{}/v2/check", self.base_url))
            .form(&[("text", text), ("language", self.language.as_str())])
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| ScoutError::GrammarEngine(format!("LanguageTool request failed: {}", e)))?;

        let body = response
            .text()
            .map_err(|e| ScoutError::GrammarEngine(format!("Failed to read LanguageTool response: {}", e)))?;

        parse_match_count(&body)
    }
}

/// Count the matches in a `/v2/check` response body
fn parse_match_count(body: &str) -> Result<u32> {
    let parsed: CheckResponse = serde_json::from_str(body)
        .map_err(|e| ScoutError::GrammarEngine(format!("Failed to parse LanguageTool response: {}", e)))?;

    for m in &parsed.matches {
        let rule = m.rule.as_ref().map(|r| r.id.as_str()).unwrap_or("-");
        log::debug!("  Grammar match [{}]: {}", rule, m.message);
    }

    u32::try_from(parsed.matches.len())
        .map_err(|_| ScoutError::GrammarEngine("Match count overflow".to_string()))
}
