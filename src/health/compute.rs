//! Compute-master prober (Spark-style JSON status endpoint over reqwest).
//!
//! # Responsibilities
//! - Liveness via GET `{master_url}/json/` with connect/read timeouts
//! - Detailed metrics parsed from the JSON status body
//!
//! # Design Decisions
//! - 2xx/3xx proceeds; anything else is an immediate DOWN with "HTTP {code}"
//! - Liveness is a textual inspection of the raw body for the status key and
//!   the ALIVE value, matching what the master actually emits; the structured
//!   parse is only for the metrics fields
//! - Application counts come from the lengths of the reported lists, not
//!   from separately reported totals

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::time::Instant;

use crate::health::probe::{Probe, ProbeFailure, ProbeResult, ServiceStatus};
use crate::health::report::{ComputeMasterMetrics, DetailedMetrics, WorkerInfo};

pub const SERVICE_NAME: &str = "compute-master";

const STATUS_PATH: &str = "/json/";

pub struct ComputeMasterProber {
    endpoint: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl ComputeMasterProber {
    pub fn new(master_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;
        let endpoint = format!("{}{STATUS_PATH}", master_url.trim_end_matches('/'));
        Ok(Self {
            endpoint,
            timeout,
            client,
        })
    }

    /// One status-endpoint round trip, yielding the raw body on 2xx/3xx.
    async fn fetch_body(&self) -> Result<String, ProbeFailure> {
        let response = self.client.get(&self.endpoint).send().await.map_err(|e| {
            if e.is_timeout() {
                ProbeFailure::Timeout(self.timeout)
            } else {
                ProbeFailure::Connectivity(e.to_string())
            }
        })?;
        let code = response.status().as_u16();
        if !(200..400).contains(&code) {
            return Err(ProbeFailure::Protocol(format!("HTTP {code}")));
        }
        response
            .text()
            .await
            .map_err(|e| ProbeFailure::Protocol(e.to_string()))
    }
}

/// The master reports ALIVE in its status body.
fn reports_alive(body: &str) -> bool {
    body.contains("\"status\"") && body.contains("\"ALIVE\"")
}

fn metrics_from_body(body: &str, latency: Duration) -> Result<ComputeMasterMetrics, ProbeFailure> {
    let root: Value =
        serde_json::from_str(body).map_err(|e| ProbeFailure::Protocol(e.to_string()))?;

    let workers = root
        .get("workers")
        .and_then(Value::as_array)
        .map(|list| list.iter().map(worker_from_json).collect())
        .unwrap_or_default();

    let alive = reports_alive(body);
    Ok(ComputeMasterMetrics {
        status: if alive { ServiceStatus::Up } else { ServiceStatus::Down },
        latency_ms: Some(latency.as_millis() as u64),
        message: if alive {
            None
        } else {
            Some("Master status not ALIVE".to_string())
        },
        master_url: root.get("url").and_then(Value::as_str).map(str::to_string),
        alive_workers: u64_field(&root, "aliveworkers"),
        total_cores: u64_field(&root, "cores"),
        used_cores: u64_field(&root, "coresused"),
        total_memory_mb: u64_field(&root, "memory"),
        used_memory_mb: u64_field(&root, "memoryused"),
        active_apps: list_len(&root, "activeapps"),
        completed_apps: list_len(&root, "completedapps"),
        workers,
    })
}

fn worker_from_json(node: &Value) -> WorkerInfo {
    WorkerInfo {
        id: str_field(node, "id"),
        host: str_field(node, "host"),
        port: u64_field(node, "port"),
        cores: u64_field(node, "cores"),
        cores_used: u64_field(node, "coresused"),
        memory_mb: u64_field(node, "memory"),
        memory_used_mb: u64_field(node, "memoryused"),
        state: str_field(node, "state"),
    }
}

fn str_field(node: &Value, key: &str) -> String {
    node.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn u64_field(node: &Value, key: &str) -> u64 {
    node.get(key).and_then(Value::as_u64).unwrap_or(0)
}

fn list_len(node: &Value, key: &str) -> usize {
    node.get(key).and_then(Value::as_array).map(Vec::len).unwrap_or(0)
}

#[async_trait]
impl Probe for ComputeMasterProber {
    fn name(&self) -> &'static str {
        SERVICE_NAME
    }

    async fn check(&self) -> ProbeResult {
        let start = Instant::now();
        match self.fetch_body().await {
            Ok(body) if reports_alive(&body) => ProbeResult::up(SERVICE_NAME, start.elapsed()),
            Ok(_) => ProbeResult::down(SERVICE_NAME, "Status not ALIVE"),
            Err(failure) => {
                tracing::warn!(service = SERVICE_NAME, error = %failure, "health check failed");
                ProbeResult::down(SERVICE_NAME, failure.to_string())
            }
        }
    }

    async fn metrics(&self) -> DetailedMetrics {
        let start = Instant::now();
        let metrics = match self.fetch_body().await {
            Ok(body) => match metrics_from_body(&body, start.elapsed()) {
                Ok(metrics) => metrics,
                Err(failure) => {
                    tracing::warn!(service = SERVICE_NAME, error = %failure, "metrics call failed");
                    ComputeMasterMetrics::down(failure.to_string())
                }
            },
            Err(failure) => {
                tracing::warn!(service = SERVICE_NAME, error = %failure, "metrics call failed");
                ComputeMasterMetrics::down(failure.to_string())
            }
        };
        DetailedMetrics::ComputeMaster(metrics)
    }
}
