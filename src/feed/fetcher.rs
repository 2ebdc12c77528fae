use std::time::Duration;

use feed_rs::parser;
use reqwest::Client;

use crate::error::Result;
use crate::models::{FeedEntry, Source};

/// Fetches one configured source and returns its entries in feed order.
/// A connection or parse failure surfaces as a per-source error; the
/// pipeline decides how to contain it.
pub trait FetchFeeds {
    async fn fetch(&self, source: &Source) -> Result<Vec<FeedEntry>>;
}

pub struct FeedFetcher {
    client: Client,
}

impl FeedFetcher {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("factfeed/0.1")
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }
}

impl FetchFeeds for FeedFetcher {
    async fn fetch(&self, source: &Source) -> Result<Vec<FeedEntry>> {
        let response = self.client.get(&source.feed_url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("Failed to fetch feed: HTTP {}", response.status()).into());
        }

        let bytes = response.bytes().await?;
        let feed = parser::parse(&bytes[..])?;

        let entries: Vec<FeedEntry> = feed
            .entries
            .into_iter()
            .map(|entry| FeedEntry {
                title: entry.title.map(|t| t.content).unwrap_or_default(),
                description: entry
                    .summary
                    .map(|s| flatten_html(&s.content))
                    .unwrap_or_default(),
                url: entry
                    .links
                    .first()
                    .map(|l| l.href.clone())
                    .unwrap_or_default(),
                published: entry.published.or(entry.updated),
            })
            .collect();

        Ok(entries)
    }
}

impl Default for FeedFetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Feed summaries frequently carry HTML markup; store them as plain text.
fn flatten_html(html: &str) -> String {
    html2text::from_read(html.as_bytes(), 10_000)
        .map(|text| text.trim().to_string())
        .unwrap_or_else(|_| html.to_string())
}
