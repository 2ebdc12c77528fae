use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed parse error: {0}")]
    FeedParse(#[from] feed_rs::parser::ParseFeedError),

    #[error("database error: {0}")]
    Database(#[from] tokio_rusqlite::Error),

    /// An insert collided with an existing unique-indexed id or url.
    /// Benign: the article is already stored.
    #[error("article already stored")]
    UniquenessConflict,

    #[error("config error: {0}")]
    Config(String),

    #[error("config parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
