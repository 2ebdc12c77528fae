use std::time::Duration;

use tokio::sync::watch;
use tracing::{info, warn};

mod config;
mod db;
mod error;
mod feed;
mod ingest;
mod models;
mod nlp;
mod scheduler;

use config::Config;
use db::Repository;
use error::Result;
use feed::FeedFetcher;
use ingest::Pipeline;
use nlp::{Categorizer, Normalizer};
use scheduler::Scheduler;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = Config::load()?;

    let repository = Repository::new(&config.db_path).await?;
    let stored = repository.count_articles().await?;
    info!(
        "Starting ingestion of {} sources ({} articles already stored)",
        config.sources.len(),
        stored
    );

    let categorizer = Categorizer::new(Normalizer::new());
    let pipeline = Pipeline::new(
        FeedFetcher::new(),
        repository,
        categorizer,
        config.sources.clone(),
    );

    // Ctrl-C requests a clean exit between passes
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => warn!("Failed to listen for shutdown signal: {}", e),
        }
    });

    let scheduler = Scheduler::new(
        pipeline,
        Duration::from_secs(config.fetch_interval_minutes * 60),
        Duration::from_secs(config.recovery_interval_minutes * 60),
        shutdown_rx,
    );
    scheduler.run().await;

    Ok(())
}
