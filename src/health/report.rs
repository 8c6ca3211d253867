//! Report model: aggregated health snapshots and detailed metrics.
//!
//! # Design Decisions
//! - Reports are immutable values built from one aggregator run
//! - `overall` is UP iff every entry is UP, otherwise DEGRADED; DEGRADED
//!   is a report-level value distinct from the per-service DOWN
//! - Detailed metrics are a closed sum type tagged by service name, not a
//!   single struct with nullable fields for every backend's stats
//! - Fields that are meaningless on failure are omitted from JSON, never
//!   emitted as null

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::health::probe::{ProbeResult, ServiceStatus};

/// Aggregate status across all probed services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverallStatus {
    #[serde(rename = "UP")]
    Up,
    #[serde(rename = "DEGRADED")]
    Degraded,
}

/// Point-in-time summary across all services, in canonical order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub overall: OverallStatus,
    #[serde(rename = "timestamp")]
    pub generated_at: DateTime<Utc>,
    pub services: Vec<ProbeResult>,
}

impl HealthReport {
    pub fn from_results(services: Vec<ProbeResult>) -> Self {
        let all_up = services.iter().all(|s| s.status.is_up());
        Self {
            overall: if all_up { OverallStatus::Up } else { OverallStatus::Degraded },
            generated_at: Utc::now(),
            services,
        }
    }
}

/// Point-in-time detailed report, same shape as [`HealthReport`] with each
/// service's full metrics instead of the bare probe result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthReport {
    pub overall: OverallStatus,
    #[serde(rename = "timestamp")]
    pub generated_at: DateTime<Utc>,
    pub services: Vec<DetailedMetrics>,
}

impl DetailedHealthReport {
    pub fn from_metrics(services: Vec<DetailedMetrics>) -> Self {
        let all_up = services.iter().all(|m| m.status().is_up());
        Self {
            overall: if all_up { OverallStatus::Up } else { OverallStatus::Degraded },
            generated_at: Utc::now(),
            services,
        }
    }
}

/// Per-backend detailed metrics, keyed by service name on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "service")]
pub enum DetailedMetrics {
    #[serde(rename = "database")]
    Database(DatabaseMetrics),
    #[serde(rename = "broker")]
    Broker(BrokerMetrics),
    #[serde(rename = "compute-master")]
    ComputeMaster(ComputeMasterMetrics),
}

impl DetailedMetrics {
    /// Status as reported by the detailed call itself, independent of any
    /// summary check made in the same tick.
    pub fn status(&self) -> ServiceStatus {
        match self {
            DetailedMetrics::Database(m) => m.status,
            DetailedMetrics::Broker(m) => m.status,
            DetailedMetrics::ComputeMaster(m) => m.status,
        }
    }
}

/// Relational-database statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseMetrics {
    pub status: ServiceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub active_connections: i64,
    pub max_connections: i64,
    pub db_size_bytes: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_size_human: Option<String>,
    pub uptime_seconds: i64,
}

impl DatabaseMetrics {
    pub fn down(cause: impl Into<String>) -> Self {
        Self {
            status: ServiceStatus::Down,
            latency_ms: None,
            message: Some(cause.into()),
            version: None,
            active_connections: 0,
            max_connections: 0,
            db_size_bytes: 0,
            db_size_human: None,
            uptime_seconds: 0,
        }
    }
}

/// Broker-cluster statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerMetrics {
    pub status: ServiceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub broker_count: usize,
    pub topic_count: usize,
    /// Sorted lexicographically by name for deterministic output.
    pub topics: Vec<TopicInfo>,
}

impl BrokerMetrics {
    pub fn down(cause: impl Into<String>) -> Self {
        Self {
            status: ServiceStatus::Down,
            latency_ms: None,
            message: Some(cause.into()),
            broker_count: 0,
            topic_count: 0,
            topics: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicInfo {
    pub name: String,
    pub partitions: usize,
    /// Replica count of the first partition; 0 when the topic has none.
    pub replication_factor: usize,
}

/// Compute-master statistics parsed from its status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeMasterMetrics {
    pub status: ServiceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master_url: Option<String>,
    pub alive_workers: u64,
    pub total_cores: u64,
    pub used_cores: u64,
    pub total_memory_mb: u64,
    pub used_memory_mb: u64,
    /// Length of the reported application lists, not a separate count field.
    pub active_apps: usize,
    pub completed_apps: usize,
    pub workers: Vec<WorkerInfo>,
}

impl ComputeMasterMetrics {
    pub fn down(cause: impl Into<String>) -> Self {
        Self {
            status: ServiceStatus::Down,
            latency_ms: None,
            message: Some(cause.into()),
            master_url: None,
            alive_workers: 0,
            total_cores: 0,
            used_cores: 0,
            total_memory_mb: 0,
            used_memory_mb: 0,
            active_apps: 0,
            completed_apps: 0,
            workers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerInfo {
    pub id: String,
    pub host: String,
    pub port: u64,
    pub cores: u64,
    pub cores_used: u64,
    pub memory_mb: u64,
    pub memory_used_mb: u64,
    pub state: String,
}
