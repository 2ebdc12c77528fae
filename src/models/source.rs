use serde::{Deserialize, Serialize};

/// A configured news feed. Static input, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    pub feed_url: String,
    pub language: String,
}
