//! Pulsewatch: aggregated health for heterogeneous backends.
//!
//! Continuously probes a relational database, a broker cluster and a
//! compute master, derives one overall status, and exposes snapshots and
//! live SSE streams over HTTP.

pub mod config;
pub mod health;
pub mod http;
pub mod ingest;
pub mod lifecycle;
pub mod observability;

pub use config::AppConfig;
pub use http::{AppState, HttpServer};
pub use lifecycle::Shutdown;
