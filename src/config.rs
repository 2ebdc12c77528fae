use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, Result};
use crate::models::Source;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: String,

    #[serde(default = "default_fetch_interval")]
    pub fetch_interval_minutes: u64,

    #[serde(default = "default_recovery_interval")]
    pub recovery_interval_minutes: u64,

    #[serde(default = "default_sources")]
    pub sources: Vec<Source>,
}

fn default_db_path() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("factfeed");
    std::fs::create_dir_all(&data_dir).ok();
    data_dir.join("articles.db").to_string_lossy().to_string()
}

fn default_fetch_interval() -> u64 {
    30
}

fn default_recovery_interval() -> u64 {
    5
}

fn default_sources() -> Vec<Source> {
    vec![
        Source {
            name: "BBC News".to_string(),
            feed_url: "http://feeds.bbci.co.uk/news/rss.xml".to_string(),
            language: "en".to_string(),
        },
        Source {
            name: "Reuters".to_string(),
            feed_url: "http://feeds.reuters.com/reuters/topNews".to_string(),
            language: "en".to_string(),
        },
        Source {
            name: "CNN".to_string(),
            feed_url: "http://rss.cnn.com/rss/edition.rss".to_string(),
            language: "en".to_string(),
        },
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            fetch_interval_minutes: default_fetch_interval(),
            recovery_interval_minutes: default_recovery_interval(),
            sources: default_sources(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("factfeed")
            .join("config.toml")
    }
}
