use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A fully enriched article as persisted in the `articles` table.
///
/// Created exactly once per (url, title) pair; this service never updates a
/// stored article in place. `upvotes`, `downvotes` and `verified` are owned
/// by downstream consumers and only initialized here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Content-addressed identifier derived from (url, title). Unique.
    pub id: String,
    pub title: String,
    pub description: String,
    /// Canonical source location. Unique.
    pub url: String,
    pub source_name: String,
    pub source_language: String,
    /// One of the fixed category labels, or "Miscellaneous".
    pub category: String,
    pub published_at: DateTime<Utc>,
    /// Set at first successful persistence, immutable afterwards.
    pub ingested_at: DateTime<Utc>,
    /// Placeholder score in [50, 100], assigned once at ingestion.
    pub trust_score: i64,
    pub upvotes: i64,
    pub downvotes: i64,
    pub verified: bool,
}
