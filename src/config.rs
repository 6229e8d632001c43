use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::vendor::criteria::CriteriaPolicy;
use crate::vendor::rate_limiter::{DEFAULT_CALL_LIMIT, DEFAULT_WINDOW};
use crate::vendor::search::SearchOptions;

/// Default Cloud App Security API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.tmcas.trendmicro.com";
/// Default base for the community (PhishTank) data feed.
pub const DEFAULT_PHISHTANK_URL: &str = "http://data.phishtank.com";
/// Default commercial (OpenPhish) feed location.
pub const DEFAULT_OPENPHISH_URL: &str = "https://openphish.com/feed.txt";

/// Credentials and endpoint for the vendor API.
#[derive(Debug, Clone)]
pub struct VendorConfig {
    pub api_key: String,
    pub base_url: String,
}

/// Client-side call budget.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub calls: u32,
    pub window: Duration,
}

/// Locations and credentials for the phishing URL feeds.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub phishtank_api_key: String,
    pub phishtank_url: String,
    pub openphish_url: String,
}

/// Central configuration loaded from environment variables.
///
/// Secrets come from env vars only. The .env file is loaded at startup
/// via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    pub vendor: VendorConfig,
    pub rate_limit: RateLimitConfig,
    pub search: SearchOptions,
    pub feeds: FeedConfig,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup. Unset and empty
    /// values fall back to defaults; malformed numbers are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let calls = parse_or(&get, "PHISHSWEEP_RATE_LIMIT", DEFAULT_CALL_LIMIT)?;
        let window_secs = parse_or(&get, "PHISHSWEEP_RATE_WINDOW_SECS", DEFAULT_WINDOW.as_secs())?;
        let defaults = SearchOptions::default();
        let lookback_days = parse_or(&get, "PHISHSWEEP_LOOKBACK_DAYS", defaults.lookback_days)?;
        let limit = parse_or(&get, "PHISHSWEEP_SEARCH_LIMIT", defaults.limit)?;
        let policy = match get("PHISHSWEEP_CRITERIA_POLICY") {
            Some(raw) => raw
                .parse::<CriteriaPolicy>()
                .context("Invalid PHISHSWEEP_CRITERIA_POLICY")?,
            None => defaults.policy,
        };

        Ok(Self {
            vendor: VendorConfig {
                api_key: get("PHISHSWEEP_API_KEY").unwrap_or_default(),
                base_url: get("PHISHSWEEP_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            },
            rate_limit: RateLimitConfig {
                calls,
                window: Duration::from_secs(window_secs),
            },
            search: SearchOptions {
                lookback_days,
                limit,
                policy,
            },
            feeds: FeedConfig {
                phishtank_api_key: get("PHISHTANK_API_KEY").unwrap_or_default(),
                phishtank_url: get("PHISHTANK_URL")
                    .unwrap_or_else(|| DEFAULT_PHISHTANK_URL.to_string()),
                openphish_url: get("OPENPHISH_URL")
                    .unwrap_or_else(|| DEFAULT_OPENPHISH_URL.to_string()),
            },
        })
    }

    /// Check that the vendor API key is configured.
    /// Call this before any search or mitigation.
    pub fn require_vendor(&self) -> Result<()> {
        if self.vendor.api_key.is_empty() {
            anyhow::bail!(
                "PHISHSWEEP_API_KEY not set. Add it to your .env file.\n\
                 See .env.example for the required variables."
            );
        }
        Ok(())
    }

    /// Check that the community feed key is configured.
    pub fn require_community_feed(&self) -> Result<()> {
        if self.feeds.phishtank_api_key.is_empty() {
            anyhow::bail!(
                "PHISHTANK_API_KEY not set. Add it to your .env file, \
                 or use `--source commercial` to skip the community feed."
            );
        }
        Ok(())
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a number, got '{raw}'")),
        None => Ok(default),
    }
}
