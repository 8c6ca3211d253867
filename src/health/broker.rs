//! Broker-cluster prober (Kafka over rdkafka metadata requests).
//!
//! # Responsibilities
//! - Liveness via a bounded cluster-metadata fetch (topic listing)
//! - Detailed metrics: broker count, topic count, per-topic partition and
//!   replication info, sorted by topic name
//!
//! # Design Decisions
//! - One metadata round trip serves both topic listing and cluster node
//!   count; any step failing aborts the whole metrics call
//! - librdkafka calls are blocking, so they run under `spawn_blocking`
//!   with the probe timeout enforced from the async side as well

use std::time::Duration;

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{BaseConsumer, Consumer};
use rdkafka::metadata::Metadata;
use tokio::time::{self, Instant};

use crate::health::probe::{Probe, ProbeFailure, ProbeResult, ServiceStatus};
use crate::health::report::{BrokerMetrics, DetailedMetrics, TopicInfo};

pub const SERVICE_NAME: &str = "broker";

pub struct BrokerProber {
    bootstrap_servers: String,
    timeout: Duration,
}

impl BrokerProber {
    pub fn new(bootstrap_servers: &[String], timeout: Duration) -> Self {
        Self {
            bootstrap_servers: bootstrap_servers.join(","),
            timeout,
        }
    }

    /// Fetch cluster metadata on the blocking pool, bounded by the probe
    /// timeout from both sides (librdkafka's own timeout plus an async one).
    async fn fetch_metadata(&self) -> Result<Metadata, ProbeFailure> {
        let servers = self.bootstrap_servers.clone();
        let timeout = self.timeout;
        let fetch = tokio::task::spawn_blocking(move || {
            let consumer: BaseConsumer = ClientConfig::new()
                .set("bootstrap.servers", &servers)
                .set("socket.timeout.ms", timeout.as_millis().to_string())
                .create()
                .map_err(|e| ProbeFailure::Connectivity(e.to_string()))?;
            consumer
                .fetch_metadata(None, timeout)
                .map_err(|e| ProbeFailure::Connectivity(e.to_string()))
        });

        match time::timeout(self.timeout + Duration::from_millis(500), fetch).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(ProbeFailure::Backend(join_error.to_string())),
            Err(_) => Err(ProbeFailure::Timeout(self.timeout)),
        }
    }
}

fn topics_from_metadata(metadata: &Metadata) -> Vec<TopicInfo> {
    let topics = metadata
        .topics()
        .iter()
        .map(|topic| TopicInfo {
            name: topic.name().to_string(),
            partitions: topic.partitions().len(),
            replication_factor: topic
                .partitions()
                .first()
                .map(|p| p.replicas().len())
                .unwrap_or(0),
        })
        .collect();
    sort_topics(topics)
}

/// Deterministic output ordering regardless of broker response order.
fn sort_topics(mut topics: Vec<TopicInfo>) -> Vec<TopicInfo> {
    topics.sort_by(|a, b| a.name.cmp(&b.name));
    topics
}

#[async_trait]
impl Probe for BrokerProber {
    fn name(&self) -> &'static str {
        SERVICE_NAME
    }

    async fn check(&self) -> ProbeResult {
        let start = Instant::now();
        match self.fetch_metadata().await {
            Ok(_) => ProbeResult::up(SERVICE_NAME, start.elapsed()),
            Err(failure) => {
                tracing::warn!(service = SERVICE_NAME, error = %failure, "health check failed");
                ProbeResult::down(SERVICE_NAME, failure.to_string())
            }
        }
    }

    async fn metrics(&self) -> DetailedMetrics {
        let start = Instant::now();
        let metrics = match self.fetch_metadata().await {
            Ok(metadata) => {
                let topics = topics_from_metadata(&metadata);
                BrokerMetrics {
                    status: ServiceStatus::Up,
                    latency_ms: Some(start.elapsed().as_millis() as u64),
                    message: None,
                    broker_count: metadata.brokers().len(),
                    topic_count: topics.len(),
                    topics,
                }
            }
            Err(failure) => {
                tracing::warn!(service = SERVICE_NAME, error = %failure, "metrics call failed");
                BrokerMetrics::down(failure.to_string())
            }
        };
        DetailedMetrics::Broker(metrics)
    }
}
