// Feed sweep pipeline: hunt for feed URLs across a list of mailboxes.
//
// Pulls phishing URLs from the configured feeds, then sweeps each URL in
// each mailbox. Every search costs one call from the vendor budget, so
// URLs are deduplicated across feeds first. A failed search is logged and
// skipped; the sweep never aborts part way through.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::feeds::FeedFetcher;
use crate::vendor::criteria::SearchCriteria;
use crate::vendor::models::EmailRecord;
use crate::vendor::search::PhishSearchClient;

/// What a feed sweep found.
#[derive(Debug, Default)]
pub struct FeedSweepSummary {
    /// Distinct URLs swept.
    pub urls: usize,
    /// Searches issued (URLs × mailboxes, or URLs when unscoped).
    pub searches: usize,
    pub failed_searches: usize,
    /// Matches, deduplicated by mailbox and unique id.
    pub records: Vec<EmailRecord>,
}

/// Fetch every feed and merge their URLs, keeping first-seen order.
/// A feed that fails to download fails the whole collection.
pub async fn collect_feed_urls(feeds: &[Box<dyn FeedFetcher>]) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    for feed in feeds {
        let fetched = feed
            .fetch()
            .await
            .with_context(|| format!("Failed to fetch {} feed", feed.name()))?;
        let before = urls.len();
        for url in fetched {
            if seen.insert(url.clone()) {
                urls.push(url);
            }
        }
        info!(feed = feed.name(), new_urls = urls.len() - before, "Feed merged");
    }

    Ok(urls)
}

/// Read a mailbox list: one address per line, `#` starts a comment.
pub fn load_mailboxes(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read mailbox list {}", path.display()))?;
    Ok(parse_mailbox_list(&text))
}

/// Parse a mailbox list. Addresses are lowercased and deduplicated.
pub fn parse_mailbox_list(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    text.lines()
        .map(|line| line.split('#').next().unwrap_or("").trim().to_lowercase())
        .filter(|line| !line.is_empty())
        .filter(|line| seen.insert(line.clone()))
        .collect()
}

/// Sweep `urls` across `mailboxes`.
///
/// With an empty mailbox list each URL is searched once across the tenant.
pub async fn run(
    search: &PhishSearchClient,
    urls: &[String],
    mailboxes: &[String],
    show_progress: bool,
) -> FeedSweepSummary {
    let scopes: Vec<Option<&String>> = if mailboxes.is_empty() {
        vec![None]
    } else {
        mailboxes.iter().map(Some).collect()
    };

    let total = (urls.len() * scopes.len()) as u64;
    let pb = if show_progress {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  Sweeping [{bar:30}] {pos}/{len} ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut summary = FeedSweepSummary {
        urls: urls.len(),
        ..FeedSweepSummary::default()
    };
    let mut seen = HashSet::new();

    for url in urls {
        for scope in &scopes {
            let mut criteria = SearchCriteria::by_url(url.clone());
            if let Some(mailbox) = scope {
                criteria = criteria.in_mailbox(mailbox.as_str());
            }

            summary.searches += 1;
            match search.search(&criteria).await {
                Ok(found) => {
                    for record in found {
                        let key = (record.mailbox.clone(), record.unique_id.clone());
                        if seen.insert(key) {
                            info!(url = %url, mailbox = %record.mailbox, "Phishing email found");
                            summary.records.push(record);
                        }
                    }
                }
                Err(e) => {
                    summary.failed_searches += 1;
                    warn!(
                        url = %url,
                        mailbox = scope.map(|m| m.as_str()).unwrap_or("*"),
                        error = %e,
                        "Sweep search failed, skipping"
                    );
                }
            }
            pb.inc(1);
        }
    }
    pb.finish_and_clear();

    info!(
        urls = summary.urls,
        searches = summary.searches,
        failed = summary.failed_searches,
        matches = summary.records.len(),
        "Feed sweep complete"
    );

    summary
}
