//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via `tracing`, initialized in main with an
//!   EnvFilter; RUST_LOG overrides the configured default
//! - Metrics are cheap atomic updates, exported on a dedicated listener
//! - Probe failures are logged where they are classified, with the
//!   internal taxonomy that never reaches the public contract

pub mod metrics;
