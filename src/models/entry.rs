use chrono::{DateTime, Utc};

/// A raw feed entry as extracted from a fetched RSS/Atom document,
/// before filtering and enrichment.
#[derive(Debug, Clone)]
pub struct FeedEntry {
    pub title: String,
    pub description: String,
    pub url: String,
    pub published: Option<DateTime<Utc>>,
}
