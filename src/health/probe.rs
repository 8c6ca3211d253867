//! Probe contract and normalized result model.
//!
//! # Responsibilities
//! - Define the uniform interface every backend prober implements
//! - Normalize heterogeneous failures into DOWN results with a cause
//! - Classify failures internally for logging without leaking the taxonomy
//!
//! # Design Decisions
//! - Probe operations never return `Err`: connectivity refusals, auth
//!   failures, malformed responses and timeouts all collapse to a DOWN
//!   result carrying a human-readable message
//! - Exactly one of latency/message is populated on a result
//! - Per-service status is binary; "degraded" exists only at report level

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::health::report::DetailedMetrics;

/// Liveness state of a single backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceStatus {
    #[serde(rename = "UP")]
    Up,
    #[serde(rename = "DOWN")]
    Down,
}

impl ServiceStatus {
    pub fn is_up(&self) -> bool {
        matches!(self, ServiceStatus::Up)
    }
}

/// Normalized outcome of one liveness check.
///
/// `latency_ms` is present iff the backend is UP; `message` carries the
/// failure cause iff it is DOWN. Absent fields are omitted from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    pub service: String,
    pub status: ServiceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ProbeResult {
    /// Successful check with the measured round-trip latency.
    pub fn up(service: &str, latency: Duration) -> Self {
        Self {
            service: service.to_string(),
            status: ServiceStatus::Up,
            latency_ms: Some(latency.as_millis() as u64),
            message: None,
        }
    }

    /// Failed check with a human-readable cause.
    pub fn down(service: &str, cause: impl Into<String>) -> Self {
        Self {
            service: service.to_string(),
            status: ServiceStatus::Down,
            latency_ms: None,
            message: Some(cause.into()),
        }
    }
}

/// Internal failure classification for probes.
///
/// All variants collapse to the same external shape (DOWN plus message);
/// the distinction exists only for logging at the point of failure.
#[derive(Debug, Error)]
pub enum ProbeFailure {
    /// Backend could not be reached (refused, DNS, pool exhausted).
    #[error("{0}")]
    Connectivity(String),

    /// The per-probe bound was exceeded.
    #[error("timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// A response arrived but was malformed or unexpected.
    #[error("{0}")]
    Protocol(String),

    /// The backend answered and reported itself unhealthy.
    #[error("{0}")]
    Backend(String),
}

/// A named capability that executes bounded-time checks against one backend.
///
/// Both operations must complete within the configured per-probe timeout and
/// must release any transient connection or session they open, regardless of
/// outcome.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Stable service identifier, used in reports and URL paths.
    fn name(&self) -> &'static str;

    /// Lightweight liveness check.
    async fn check(&self) -> ProbeResult;

    /// Richer backend-specific statistics.
    async fn metrics(&self) -> DetailedMetrics;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_up_result_has_latency_only() {
        let result = ProbeResult::up("database", Duration::from_millis(12));
        assert_eq!(result.status, ServiceStatus::Up);
        assert_eq!(result.latency_ms, Some(12));
        assert!(result.message.is_none());
    }

    #[test]
    fn test_down_result_has_message_only() {
        let result = ProbeResult::down("broker", "connection refused");
        assert_eq!(result.status, ServiceStatus::Down);
        assert!(result.latency_ms.is_none());
        assert_eq!(result.message.as_deref(), Some("connection refused"));
    }

    #[test]
    fn test_json_omits_absent_fields() {
        let up = serde_json::to_value(ProbeResult::up("database", Duration::from_millis(5))).unwrap();
        assert!(up.get("message").is_none());
        assert_eq!(up["latencyMs"], 5);
        assert_eq!(up["status"], "UP");

        let down = serde_json::to_value(ProbeResult::down("database", "boom")).unwrap();
        assert!(down.get("latencyMs").is_none());
        assert_eq!(down["message"], "boom");
        assert_eq!(down["status"], "DOWN");
    }

    #[test]
    fn test_timeout_failure_message() {
        let failure = ProbeFailure::Timeout(Duration::from_secs(5));
        assert_eq!(failure.to_string(), "timed out after 5s");
    }
}
