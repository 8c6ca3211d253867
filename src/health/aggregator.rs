//! Probe aggregation.
//!
//! # Responsibilities
//! - Run all configured probes concurrently and collect results in canonical
//!   service order (database, broker, compute-master)
//! - Derive the overall report status
//!
//! # Design Decisions
//! - `join_all` preserves input order, so results land in canonical order
//!   regardless of which probe finishes first
//! - No caching here; freshness policy lives in the report hub layer
//! - Each invocation is an independent attempt, no retries

use std::sync::Arc;

use futures_util::future::join_all;

use crate::health::probe::Probe;
use crate::health::report::{DetailedHealthReport, HealthReport};

pub struct Aggregator {
    probes: Vec<Arc<dyn Probe>>,
}

impl Aggregator {
    /// Probes must be supplied in canonical service order.
    pub fn new(probes: Vec<Arc<dyn Probe>>) -> Self {
        Self { probes }
    }

    /// Look up a single probe by service name.
    pub fn probe(&self, service: &str) -> Option<&Arc<dyn Probe>> {
        self.probes.iter().find(|p| p.name() == service)
    }

    /// Concurrent `check()` on every probe; blocks until all have returned.
    pub async fn run_summary(&self) -> HealthReport {
        let results = join_all(self.probes.iter().map(|p| p.check())).await;
        HealthReport::from_results(results)
    }

    /// Concurrent `metrics()` on every probe. Per-service status comes from
    /// each detailed result itself, never from a summary check.
    pub async fn run_detailed(&self) -> DetailedHealthReport {
        let results = join_all(self.probes.iter().map(|p| p.metrics())).await;
        DetailedHealthReport::from_metrics(results)
    }
}
