// Community feed: PhishTank's verified, currently-online phishing list.
//
// The feed is a CSV dump (phish_id, url, phish_detail_url, ...). Only the
// `url` column is kept. The body is spooled through an anonymous scratch
// file before parsing; the file is gone once it is dropped.

use std::io::{Read, Seek, SeekFrom, Write};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use super::traits::FeedFetcher;
use crate::config::FeedConfig;
use crate::error::{Error, Result};

/// PhishTank online-valid feed client.
pub struct CommunityFeed {
    client: reqwest::Client,
    url: String,
}

impl CommunityFeed {
    pub fn new(config: &FeedConfig) -> Result<Self> {
        if config.phishtank_api_key.is_empty() {
            return Err(Error::Config("community feed requires an API key".into()));
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("phishtank/phishsweep-", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            url: feed_url(&config.phishtank_url, &config.phishtank_api_key),
        })
    }
}

/// `{base}/data/{key}/online-valid.csv`
pub fn feed_url(base: &str, api_key: &str) -> String {
    format!(
        "{}/data/{}/online-valid.csv",
        base.trim_end_matches('/'),
        api_key
    )
}

#[async_trait]
impl FeedFetcher for CommunityFeed {
    fn name(&self) -> &'static str {
        "community"
    }

    async fn fetch(&self) -> Result<Vec<String>> {
        debug!("Fetching community phishing feed");

        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if status.as_u16() != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::RemoteApi {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let urls = parse_via_scratch(&bytes)?;

        info!(count = urls.len(), "Community feed fetched");
        Ok(urls)
    }
}

#[derive(Deserialize)]
struct FeedRow {
    url: String,
}

/// Spool `body` to an anonymous temp file, skipping blank lines, and parse
/// it from there.
pub fn parse_via_scratch(body: &[u8]) -> Result<Vec<String>> {
    let mut scratch = tempfile::tempfile()?;
    for line in body.split(|&b| b == b'\n') {
        if line.iter().all(|b| b.is_ascii_whitespace()) {
            continue;
        }
        scratch.write_all(line)?;
        scratch.write_all(b"\n")?;
    }
    scratch.flush()?;
    scratch.seek(SeekFrom::Start(0))?;
    parse_community_csv(scratch)
}

/// Extract the `url` column, in row order, from a headed CSV.
pub fn parse_community_csv<R: Read>(reader: R) -> Result<Vec<String>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut urls = Vec::new();
    for row in csv_reader.deserialize::<FeedRow>() {
        let row = row?;
        if !row.url.is_empty() {
            urls.push(row.url);
        }
    }
    Ok(urls)
}
