// Commercial feed: OpenPhish's plain-text URL list, one URL per line.
//
// The feed endpoint turns away non-browser clients, so requests carry a
// desktop Chrome user agent.

use async_trait::async_trait;
use tracing::{debug, info};

use super::traits::FeedFetcher;
use crate::config::FeedConfig;
use crate::error::{Error, Result};

/// User agent sent to the commercial feed.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/72.0.3626.121 Safari/537.36";

/// OpenPhish feed client.
pub struct CommercialFeed {
    client: reqwest::Client,
    url: String,
}

impl CommercialFeed {
    pub fn new(config: &FeedConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            url: config.openphish_url.clone(),
        })
    }
}

#[async_trait]
impl FeedFetcher for CommercialFeed {
    fn name(&self) -> &'static str {
        "commercial"
    }

    async fn fetch(&self) -> Result<Vec<String>> {
        debug!(url = %self.url, "Fetching commercial phishing feed");

        let response = self.client.get(&self.url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        if status != 200 {
            return Err(Error::RemoteApi { status, body });
        }

        let urls = parse_commercial_feed(&body);
        info!(count = urls.len(), "Commercial feed fetched");
        Ok(urls)
    }
}

/// Split a newline-delimited feed, dropping blank lines.
pub fn parse_commercial_feed(body: &str) -> Vec<String> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
