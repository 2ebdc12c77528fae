use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use tokio_rusqlite::Connection;

use crate::error::{AppError, Result};
use crate::models::Article;

use super::schema::SCHEMA;

/// SQLite-backed article store. The unique indexes on `id` and `url` are
/// the only synchronization primitive the ingestion pipeline relies on:
/// a lost insert race surfaces as [`AppError::UniquenessConflict`].
#[derive(Clone)]
pub struct Repository {
    conn: Connection,
}

impl Repository {
    pub async fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path).await?;

        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    pub async fn article_exists(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        let exists = self
            .conn
            .call(move |conn| {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM articles WHERE id = ?1",
                    params![id],
                    |row| row.get(0),
                )?;
                Ok(count > 0)
            })
            .await?;
        Ok(exists)
    }

    /// Inserts a new article. A collision with an existing `id` or `url`
    /// returns [`AppError::UniquenessConflict`]; the stored row is never
    /// overwritten.
    pub async fn insert_article(&self, article: Article) -> Result<()> {
        let result = self
            .conn
            .call(move |conn| {
                conn.execute(
                    r#"INSERT INTO articles (id, title, description, url, source_name,
                                             source_language, category, published_at,
                                             ingested_at, trust_score, upvotes, downvotes, verified)
                       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"#,
                    params![
                        article.id,
                        article.title,
                        article.description,
                        article.url,
                        article.source_name,
                        article.source_language,
                        article.category,
                        article.published_at.to_rfc3339(),
                        article.ingested_at.to_rfc3339(),
                        article.trust_score,
                        article.upvotes,
                        article.downvotes,
                        article.verified,
                    ],
                )?;
                Ok(())
            })
            .await;

        match result {
            Ok(()) => Ok(()),
            Err(tokio_rusqlite::Error::Rusqlite(e)) if is_unique_violation(&e) => {
                Err(AppError::UniquenessConflict)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn count_articles(&self) -> Result<i64> {
        let count = self
            .conn
            .call(|conn| {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))?;
                Ok(count)
            })
            .await?;
        Ok(count)
    }

    #[allow(dead_code)]
    pub async fn get_article(&self, id: &str) -> Result<Option<Article>> {
        let id = id.to_string();
        let article = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    r#"SELECT id, title, description, url, source_name, source_language,
                              category, published_at, ingested_at, trust_score,
                              upvotes, downvotes, verified
                       FROM articles WHERE id = ?1"#,
                )?;
                let article = stmt
                    .query_row(params![id], |row| Ok(article_from_row(row)))
                    .optional()?;
                Ok(article)
            })
            .await?;
        Ok(article)
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    // Try RFC3339 first (e.g., "2026-01-11T12:34:56+00:00")
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Try SQLite datetime format (e.g., "2026-01-11 12:34:56")
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    None
}

fn article_from_row(row: &Row) -> Article {
    Article {
        id: row.get(0).unwrap(),
        title: row.get(1).unwrap(),
        description: row.get(2).unwrap(),
        url: row.get(3).unwrap(),
        source_name: row.get(4).unwrap(),
        source_language: row.get(5).unwrap(),
        category: row.get(6).unwrap(),
        published_at: row
            .get::<_, String>(7)
            .ok()
            .and_then(|s| parse_datetime(&s))
            .unwrap_or_else(Utc::now),
        ingested_at: row
            .get::<_, String>(8)
            .ok()
            .and_then(|s| parse_datetime(&s))
            .unwrap_or_else(Utc::now),
        trust_score: row.get(9).unwrap(),
        upvotes: row.get(10).unwrap(),
        downvotes: row.get(11).unwrap(),
        verified: row.get::<_, i64>(12).unwrap() != 0,
    }
}
