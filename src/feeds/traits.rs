// Feed fetcher trait — the swap-ready abstraction over URL sources.

use async_trait::async_trait;

use crate::error::Result;

/// A source of known-phishing URLs.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Short name for logs and terminal output.
    fn name(&self) -> &'static str;

    /// Download the current feed. Every call hits the network; nothing is
    /// cached.
    async fn fetch(&self) -> Result<Vec<String>>;
}
