use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info};

use crate::ingest::RunPipeline;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Running,
    Sleeping,
    Terminated,
}

/// Drives repeated ingestion passes at a fixed interval.
///
/// A completed pass sleeps for `fetch_interval`; a pass that fails at the
/// top level sleeps for the shorter `recovery_interval` and tries again.
/// The shutdown signal is observed while sleeping and before starting a
/// pass, never mid-pass, so the loop always exits between passes.
pub struct Scheduler<P> {
    pipeline: P,
    fetch_interval: Duration,
    recovery_interval: Duration,
    shutdown: watch::Receiver<bool>,
}

impl<P: RunPipeline> Scheduler<P> {
    pub fn new(
        pipeline: P,
        fetch_interval: Duration,
        recovery_interval: Duration,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            pipeline,
            fetch_interval,
            recovery_interval,
            shutdown,
        }
    }

    pub async fn run(mut self) {
        let mut state = State::Running;
        let mut next_sleep = self.fetch_interval;

        loop {
            match state {
                State::Running => {
                    if *self.shutdown.borrow() {
                        state = State::Terminated;
                        continue;
                    }
                    match self.pipeline.run_once().await {
                        Ok(stats) => {
                            info!(
                                "Ingestion pass complete: {} entries examined, {} new articles",
                                stats.examined, stats.stored
                            );
                            next_sleep = self.fetch_interval;
                        }
                        Err(e) => {
                            error!("Ingestion pass failed: {}", e);
                            next_sleep = self.recovery_interval;
                        }
                    }
                    state = State::Sleeping;
                }
                State::Sleeping => {
                    tokio::select! {
                        _ = tokio::time::sleep(next_sleep) => state = State::Running,
                        // fires on signal, or if the sender is dropped
                        _ = self.shutdown.changed() => state = State::Terminated,
                    }
                }
                State::Terminated => break,
            }
        }

        info!("Scheduler stopped");
    }
}
