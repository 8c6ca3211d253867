//! Ingestion-event publishing onto the broker.

use std::time::Duration;

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;

use crate::ingest::IngestError;

/// Forwards ingestion events; implementations must not block ingest on
/// broker availability longer than their own delivery timeout.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event_type: &str, payload: &serde_json::Value)
        -> Result<(), IngestError>;
}

/// Publisher used when event forwarding is disabled.
pub struct NoopPublisher;

#[async_trait]
impl EventPublisher for NoopPublisher {
    async fn publish(
        &self,
        _event_type: &str,
        _payload: &serde_json::Value,
    ) -> Result<(), IngestError> {
        Ok(())
    }
}

pub struct KafkaPublisher {
    producer: FutureProducer,
    topic: String,
}

impl KafkaPublisher {
    pub fn new(bootstrap_servers: &[String], topic: &str) -> Result<Self, IngestError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", bootstrap_servers.join(","))
            .set("acks", "all")
            .set("message.timeout.ms", "5000")
            .create()
            .map_err(|e| IngestError::Broker(e.to_string()))?;
        Ok(Self {
            producer,
            topic: topic.to_string(),
        })
    }
}

#[async_trait]
impl EventPublisher for KafkaPublisher {
    async fn publish(
        &self,
        event_type: &str,
        payload: &serde_json::Value,
    ) -> Result<(), IngestError> {
        let envelope = serde_json::json!({
            "event_type": event_type,
            "payload": payload,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });
        let bytes = serde_json::to_vec(&envelope)?;

        let record = FutureRecord::to(&self.topic).payload(&bytes).key(event_type);
        self.producer
            .send(record, Timeout::After(Duration::from_secs(5)))
            .await
            .map_err(|(error, _message)| IngestError::Broker(error.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_publisher_accepts_everything() {
        let publisher = NoopPublisher;
        let payload = serde_json::json!({"text": "hello"});
        assert!(publisher.publish("record-ingested", &payload).await.is_ok());
    }
}
