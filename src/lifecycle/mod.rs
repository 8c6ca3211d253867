//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! SIGTERM/SIGINT
//!     → Shutdown::listen_for_signals
//!     → broadcast to scheduler and HTTP server
//!     → loops exit, server drains, process ends
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
