//! HTTP boundary facade.
//!
//! # Data Flow
//! ```text
//! snapshot request → handlers.rs → Aggregator / ReportHub freshness window
//! stream request   → sse.rs → broadcast subscription, per-session sequence
//! record request   → handlers.rs → IngestService
//! ```

pub mod handlers;
pub mod server;
pub mod sse;

pub use server::{build_router, AppState, HttpServer};
