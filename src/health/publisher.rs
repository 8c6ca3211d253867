//! Report caching, fan-out and the periodic scheduler.
//!
//! # Data Flow
//! ```text
//! Scheduler tick (every tick_interval):
//!     Aggregator::run_summary()
//!     → ReportHub::publish (atomic cache replace + broadcast fan-out)
//!     → all live stream subscribers
//!
//! Snapshot request:
//!     ReportHub::fresh(tick_interval)  → cached report, or
//!     Aggregator::run_* + ReportHub::store on a miss
//! ```
//!
//! # Design Decisions
//! - The cache is an `ArcSwapOption`: readers always observe a complete
//!   report, old or new, never a partial one
//! - One probe run per tick is shared by every subscriber; subscribing never
//!   triggers probing
//! - Sequence numbering is per subscriber session and lives in the SSE
//!   handler, so a reconnect starts fresh with no replay
//! - Detailed probing is skipped on ticks with no detailed subscribers

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use tokio::sync::broadcast;
use tokio::time::{self, Instant};

use crate::health::aggregator::Aggregator;
use crate::health::report::{DetailedHealthReport, HealthReport};
use crate::observability::metrics;

/// Cached report plus the instant it was stored, for freshness checks.
struct CachedReport<T> {
    report: Arc<T>,
    stored_at: Instant,
}

/// Holds the most recent report of one kind and fans new ones out to
/// stream subscribers.
pub struct ReportHub<T> {
    current: ArcSwapOption<CachedReport<T>>,
    tx: broadcast::Sender<Arc<T>>,
}

impl<T> ReportHub<T> {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            current: ArcSwapOption::empty(),
            tx,
        }
    }

    /// Replace the cached report without notifying subscribers. Used by
    /// snapshot reads that recompute off-cadence.
    pub fn store(&self, report: T) -> Arc<T> {
        let report = Arc::new(report);
        self.current.store(Some(Arc::new(CachedReport {
            report: report.clone(),
            stored_at: Instant::now(),
        })));
        report
    }

    /// Replace the cached report and push it to all live subscribers.
    pub fn publish(&self, report: T) -> Arc<T> {
        let report = self.store(report);
        let _ = self.tx.send(report.clone());
        report
    }

    /// The current report, if younger than `max_age`.
    pub fn fresh(&self, max_age: Duration) -> Option<Arc<T>> {
        self.current
            .load()
            .as_ref()
            .filter(|cached| cached.stored_at.elapsed() <= max_age)
            .map(|cached| cached.report.clone())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<T>> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Periodic driver refreshing both report kinds on a fixed interval.
pub struct HealthScheduler {
    aggregator: Arc<Aggregator>,
    summary: Arc<ReportHub<HealthReport>>,
    detailed: Arc<ReportHub<DetailedHealthReport>>,
    interval: Duration,
}

impl HealthScheduler {
    pub fn new(
        aggregator: Arc<Aggregator>,
        summary: Arc<ReportHub<HealthReport>>,
        detailed: Arc<ReportHub<DetailedHealthReport>>,
        interval: Duration,
    ) -> Self {
        Self {
            aggregator,
            summary,
            detailed,
            interval,
        }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_ms = self.interval.as_millis() as u64,
            "health scheduler starting"
        );

        let mut ticker = time::interval(self.interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("health scheduler received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    async fn tick(&self) {
        let report = self.aggregator.run_summary().await;
        for result in &report.services {
            metrics::record_probe(result);
        }
        self.summary.publish(report);

        if self.detailed.subscriber_count() > 0 {
            let report = self.aggregator.run_detailed().await;
            self.detailed.publish(report);
        }
    }
}
