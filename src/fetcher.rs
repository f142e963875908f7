use crate::config::FetchConfig;
use crate::types::{DigestError, FeedEntry, Result};
use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use reqwest::Client;
use tracing::{debug, warn};

/// Seam between the pipeline and the network, so tests can substitute canned
/// feeds for live RSS endpoints.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch one feed URL and parse it into entries, in feed order.
    async fn fetch(&self, url: &str) -> Result<Vec<FeedEntry>>;
}

pub struct HttpFeedSource {
    client: Client,
    config: FetchConfig,
}

impl HttpFeedSource {
    pub fn new(client: Client, config: FetchConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self, url: &str) -> Result<Vec<FeedEntry>> {
        debug!("Fetching feed: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DigestError::Feed(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body = response.text().await?;
        let feed = feed_rs::parser::parse(body.as_bytes())
            .map_err(|e| DigestError::Feed(format!("failed to parse feed: {}", e)))?;

        let entries: Vec<FeedEntry> = feed
            .entries
            .into_iter()
            .take(self.config.max_entries_per_feed)
            .map(|entry| FeedEntry {
                title: entry.title.map(|t| t.content).unwrap_or_default(),
                link: entry.links.first().map(|l| l.href.clone()).unwrap_or_default(),
                summary: entry
                    .summary
                    .map(|s| s.content)
                    .or_else(|| entry.content.and_then(|c| c.body))
                    .unwrap_or_default(),
                published: entry.published.map(|dt| dt.with_timezone(&Utc)),
            })
            .collect();

        debug!("Parsed {} entries from {}", entries.len(), url);
        Ok(entries)
    }
}

/// Fire all of a topic's feed requests at once and join them, preserving the
/// configured feed order. A failed or malformed feed is logged and dropped;
/// the other feeds' entries are unaffected.
pub async fn fetch_topic_feeds(
    source: &dyn FeedSource,
    urls: &[String],
) -> Vec<(String, Vec<FeedEntry>)> {
    let results = join_all(urls.iter().map(|url| source.fetch(url))).await;

    let mut feeds = Vec::with_capacity(urls.len());
    for (url, result) in urls.iter().zip(results) {
        match result {
            Ok(entries) => feeds.push((url.clone(), entries)),
            Err(e) => warn!("Skipping feed {}: {}", url, e),
        }
    }
    feeds
}
