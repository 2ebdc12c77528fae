use chrono::Utc;
use futures::stream::{self, StreamExt};
use rand::{rng, Rng};

use crate::db::Repository;
use crate::error::{AppError, Result};
use crate::feed::FetchFeeds;
use crate::models::{Article, FeedEntry, Source};
use crate::nlp::Categorizer;

use super::id::article_id;

/// Max sources fetched concurrently in one pass.
const MAX_CONCURRENT_FETCHES: usize = 5;

/// Best-effort counters for one ingestion pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunStats {
    pub examined: usize,
    pub stored: usize,
}

/// One full ingestion pass over all configured sources. Implemented by
/// [`Pipeline`]; the scheduler only depends on this contract.
pub trait RunPipeline {
    async fn run_once(&self) -> Result<RunStats>;
}

enum EntryOutcome {
    Stored,
    /// Entry had an empty title or url.
    Skipped,
    /// Article is already in the store, by prior run or by losing an
    /// insert race.
    Duplicate,
}

/// Fetches every configured source, filters and enriches each entry, and
/// persists what has not been seen before.
///
/// Failures are contained at the smallest scope that preserves forward
/// progress: a failing entry skips that entry, a failing source skips that
/// source, and a pass always yields stats for whatever did succeed.
pub struct Pipeline<F> {
    fetcher: F,
    repository: Repository,
    categorizer: Categorizer,
    sources: Vec<Source>,
}

impl<F: FetchFeeds> Pipeline<F> {
    pub fn new(
        fetcher: F,
        repository: Repository,
        categorizer: Categorizer,
        sources: Vec<Source>,
    ) -> Self {
        Self {
            fetcher,
            repository,
            categorizer,
            sources,
        }
    }

    async fn ingest_source(&self, source: &Source, entries: Vec<FeedEntry>) -> RunStats {
        let mut stats = RunStats::default();
        for entry in entries {
            stats.examined += 1;
            match self.ingest_entry(source, entry).await {
                Ok(EntryOutcome::Stored) => stats.stored += 1,
                Ok(EntryOutcome::Skipped) | Ok(EntryOutcome::Duplicate) => {}
                Err(e) => {
                    tracing::warn!("Failed to process entry from {}: {}", source.name, e);
                }
            }
        }
        stats
    }

    async fn ingest_entry(&self, source: &Source, entry: FeedEntry) -> Result<EntryOutcome> {
        if entry.title.is_empty() || entry.url.is_empty() {
            return Ok(EntryOutcome::Skipped);
        }

        let id = article_id(&entry.url, &entry.title);
        if self.repository.article_exists(&id).await? {
            return Ok(EntryOutcome::Duplicate);
        }

        let category = self.categorizer.categorize(&entry.title, &entry.description);
        let title = entry.title.clone();
        let article = Article {
            id,
            title: entry.title,
            description: entry.description,
            url: entry.url,
            source_name: source.name.clone(),
            source_language: source.language.clone(),
            category: category.to_string(),
            published_at: entry.published.unwrap_or_else(Utc::now),
            ingested_at: Utc::now(),
            trust_score: rng().random_range(50..=100),
            upvotes: 0,
            downvotes: 0,
            verified: false,
        };

        match self.repository.insert_article(article).await {
            Ok(()) => {
                tracing::debug!("Added new article: {:.50}", title);
                Ok(EntryOutcome::Stored)
            }
            // another actor inserted the same id or url first
            Err(AppError::UniquenessConflict) => Ok(EntryOutcome::Duplicate),
            Err(e) => Err(e),
        }
    }
}

impl<F: FetchFeeds> RunPipeline for Pipeline<F> {
    async fn run_once(&self) -> Result<RunStats> {
        let fetched: Vec<(&Source, Result<Vec<FeedEntry>>)> = stream::iter(&self.sources)
            .map(|source| async move { (source, self.fetcher.fetch(source).await) })
            .buffer_unordered(MAX_CONCURRENT_FETCHES)
            .collect()
            .await;

        let mut stats = RunStats::default();
        for (source, result) in fetched {
            let entries = match result {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!("Failed to fetch {}: {}", source.name, e);
                    continue;
                }
            };
            tracing::debug!("Fetched {} entries from {}", entries.len(), source.name);

            let source_stats = self.ingest_source(source, entries).await;
            stats.examined += source_stats.examined;
            stats.stored += source_stats.stored;
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    use tempfile::TempDir;

    use crate::nlp::Normalizer;

    struct StubFetcher {
        feeds: HashMap<String, Vec<FeedEntry>>,
        failing: HashSet<String>,
    }

    impl FetchFeeds for StubFetcher {
        async fn fetch(&self, source: &Source) -> Result<Vec<FeedEntry>> {
            if self.failing.contains(&source.name) {
                return Err(anyhow::anyhow!("connection refused").into());
            }
            Ok(self.feeds.get(&source.name).cloned().unwrap_or_default())
        }
    }

    fn source(name: &str) -> Source {
        Source {
            name: name.to_string(),
            feed_url: format!("http://feeds.test/{name}"),
            language: "en".to_string(),
        }
    }

    fn entry(title: &str, url: &str) -> FeedEntry {
        FeedEntry {
            title: title.to_string(),
            description: String::new(),
            url: url.to_string(),
            published: None,
        }
    }

    async fn pipeline_with(
        feeds: HashMap<String, Vec<FeedEntry>>,
        failing: HashSet<String>,
        sources: Vec<Source>,
    ) -> (Pipeline<StubFetcher>, Repository, TempDir) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("articles.db");
        let repository = Repository::new(path.to_str().unwrap()).await.unwrap();
        let pipeline = Pipeline::new(
            StubFetcher { feeds, failing },
            repository.clone(),
            Categorizer::new(Normalizer::new()),
            sources,
        );
        (pipeline, repository, dir)
    }

    #[tokio::test]
    async fn stores_new_entries_and_reports_counts() {
        let feeds = HashMap::from([(
            "wire".to_string(),
            vec![
                entry("Senate Passes New Budget Law", "http://a/1"),
                entry("Quiet day everywhere", "http://a/2"),
            ],
        )]);
        let (pipeline, repo, _dir) =
            pipeline_with(feeds, HashSet::new(), vec![source("wire")]).await;

        let stats = pipeline.run_once().await.unwrap();
        assert_eq!(stats.examined, 2);
        assert_eq!(stats.stored, 2);
        assert_eq!(repo.count_articles().await.unwrap(), 2);

        let id = article_id("http://a/1", "Senate Passes New Budget Law");
        let stored = repo.get_article(&id).await.unwrap().unwrap();
        assert_eq!(stored.category, "Politics");
        assert_eq!(stored.source_name, "wire");
        assert!((50..=100).contains(&stored.trust_score));
    }

    #[tokio::test]
    async fn second_run_on_unchanged_feed_stores_nothing() {
        let feeds = HashMap::from([(
            "wire".to_string(),
            vec![entry("X", "http://a/1"), entry("Y", "http://a/2")],
        )]);
        let (pipeline, repo, _dir) =
            pipeline_with(feeds, HashSet::new(), vec![source("wire")]).await;

        let first = pipeline.run_once().await.unwrap();
        assert_eq!(first.stored, 2);

        let second = pipeline.run_once().await.unwrap();
        assert_eq!(second.examined, 2);
        assert_eq!(second.stored, 0);
        assert_eq!(repo.count_articles().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn entries_without_title_or_url_are_skipped() {
        let feeds = HashMap::from([(
            "wire".to_string(),
            vec![
                entry("", "http://a/1"),
                entry("No link", ""),
                entry("Kept", "http://a/2"),
            ],
        )]);
        let (pipeline, repo, _dir) =
            pipeline_with(feeds, HashSet::new(), vec![source("wire")]).await;

        let stats = pipeline.run_once().await.unwrap();
        assert_eq!(stats.examined, 3);
        assert_eq!(stats.stored, 1);
        assert_eq!(repo.count_articles().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn duplicate_entries_within_one_feed_are_stored_once() {
        let feeds = HashMap::from([(
            "wire".to_string(),
            vec![entry("X", "http://a/1"), entry("X", "http://a/1")],
        )]);
        let (pipeline, repo, _dir) =
            pipeline_with(feeds, HashSet::new(), vec![source("wire")]).await;

        let stats = pipeline.run_once().await.unwrap();
        assert_eq!(stats.stored, 1);
        assert_eq!(repo.count_articles().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn colliding_url_with_different_title_is_a_benign_skip() {
        // different titles hash to different ids, but the url unique index
        // still rejects the second insert
        let feeds = HashMap::from([(
            "wire".to_string(),
            vec![entry("First take", "http://a/1"), entry("Second take", "http://a/1")],
        )]);
        let (pipeline, repo, _dir) =
            pipeline_with(feeds, HashSet::new(), vec![source("wire")]).await;

        let stats = pipeline.run_once().await.unwrap();
        assert_eq!(stats.examined, 2);
        assert_eq!(stats.stored, 1);
        assert_eq!(repo.count_articles().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn failing_source_does_not_abort_the_others() {
        let feeds = HashMap::from([(
            "healthy".to_string(),
            vec![entry("X", "http://a/1")],
        )]);
        let failing = HashSet::from(["broken".to_string()]);
        let (pipeline, repo, _dir) = pipeline_with(
            feeds,
            failing,
            vec![source("broken"), source("healthy")],
        )
        .await;

        let stats = pipeline.run_once().await.unwrap();
        assert_eq!(stats.stored, 1);
        assert_eq!(repo.count_articles().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn missing_published_date_falls_back_to_ingestion_time() {
        let feeds = HashMap::from([(
            "wire".to_string(),
            vec![entry("X", "http://a/1")],
        )]);
        let (pipeline, repo, _dir) =
            pipeline_with(feeds, HashSet::new(), vec![source("wire")]).await;

        let before = Utc::now();
        pipeline.run_once().await.unwrap();
        let after = Utc::now();

        let id = article_id("http://a/1", "X");
        let stored = repo.get_article(&id).await.unwrap().unwrap();
        assert!(stored.published_at >= before && stored.published_at <= after);
    }
}
