//! Health-probe aggregation engine.
//!
//! # Data Flow
//! ```text
//! Scheduler tick (publisher.rs):
//!     → Aggregator::run_summary / run_detailed (aggregator.rs)
//!     → concurrent Probe::check / metrics (database.rs, broker.rs, compute.rs)
//!     → normalized results (probe.rs)
//!     → overall-status derivation (report.rs)
//!     → ReportHub: atomic cache replace + broadcast fan-out (publisher.rs)
//! ```
//!
//! # Design Decisions
//! - One probe contract over three wildly different native protocols
//!   (SQL, cluster-admin metadata, JSON-over-HTTP)
//! - Failures are contained at the probe boundary; one backend going down
//!   never prevents reporting on the others
//! - Canonical service order is fixed: database, broker, compute-master

pub mod aggregator;
pub mod broker;
pub mod compute;
pub mod database;
pub mod probe;
pub mod publisher;
pub mod report;

pub use aggregator::Aggregator;
pub use probe::{Probe, ProbeResult, ServiceStatus};
pub use publisher::{HealthScheduler, ReportHub};
pub use report::{DetailedHealthReport, DetailedMetrics, HealthReport, OverallStatus};
