//! Advisor configuration.
//!
//! Credentials are explicit fields. An absent key disables the tools that
//! need it when the registry is built; nothing is looked up at call time.

use std::time::Duration;

use crate::error::{AdvisorError, Result};

pub const DEFAULT_ODDS_BASE_URL: &str = "https://api.the-odds-api.com/v4";
pub const DEFAULT_SERPAPI_BASE_URL: &str = "https://serpapi.com";

#[derive(Clone, Debug)]
pub struct AdvisorConfig {
    /// The Odds API key (`ODDS_API_KEY`)
    pub odds_api_key: Option<String>,

    /// SerpAPI key (`SERPAPI_KEY`)
    pub serpapi_key: Option<String>,

    pub odds_base_url: String,
    pub serpapi_base_url: String,

    /// Default bookmaker regions for odds requests
    pub regions: String,

    /// Default markets for odds requests
    pub markets: String,

    /// Timeout for odds and search HTTP calls
    pub http_timeout: Duration,

    /// Timeout for the ping subprocess
    pub ping_timeout: Duration,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            odds_api_key: None,
            serpapi_key: None,
            odds_base_url: DEFAULT_ODDS_BASE_URL.into(),
            serpapi_base_url: DEFAULT_SERPAPI_BASE_URL.into(),
            regions: "eu".into(),
            markets: "h2h".into(),
            http_timeout: Duration::from_secs(10),
            ping_timeout: Duration::from_secs(10),
        }
    }
}

impl AdvisorConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as absent
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            odds_api_key: get("ODDS_API_KEY"),
            serpapi_key: get("SERPAPI_KEY"),
            odds_base_url: get("ODDS_API_BASE_URL").unwrap_or(defaults.odds_base_url),
            serpapi_base_url: get("SERPAPI_BASE_URL").unwrap_or(defaults.serpapi_base_url),
            regions: get("ODDS_REGIONS").unwrap_or(defaults.regions),
            markets: get("ODDS_MARKETS").unwrap_or(defaults.markets),
            ..defaults
        }
    }

    pub fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.http_timeout)
            .build()
            .map_err(|e| AdvisorError::Config(format!("HTTP client: {e}")))
    }
}
