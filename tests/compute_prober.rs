//! Integration tests for the compute-master prober against a mock master.

use std::time::Duration;

use pulsewatch::health::compute::ComputeMasterProber;
use pulsewatch::health::probe::Probe;
use pulsewatch::health::report::DetailedMetrics;
use pulsewatch::health::ServiceStatus;

mod common;
use common::start_mock_master;

fn alive_body() -> String {
    serde_json::json!({
        "url": "spark://master:7077",
        "workers": [
            {"id": "w-1", "host": "10.0.0.5", "port": 35001, "cores": 8,
             "coresused": 2, "memory": 16384, "memoryused": 4096, "state": "ALIVE"},
            {"id": "w-2", "host": "10.0.0.6", "port": 35002, "cores": 8,
             "coresused": 0, "memory": 16384, "memoryused": 0, "state": "ALIVE"}
        ],
        "aliveworkers": 2,
        "cores": 16,
        "coresused": 2,
        "memory": 32768,
        "memoryused": 4096,
        "activeapps": [],
        "completedapps": [],
        "status": "ALIVE"
    })
    .to_string()
}

#[tokio::test]
async fn test_alive_master_reports_up() {
    let addr = start_mock_master(200, alive_body()).await;
    let prober =
        ComputeMasterProber::new(&format!("http://{addr}"), Duration::from_secs(5)).unwrap();

    let result = prober.check().await;
    assert_eq!(result.status, ServiceStatus::Up);
    assert!(result.latency_ms.is_some());
    assert!(result.message.is_none());
}

#[tokio::test]
async fn test_alive_master_metrics_parse_workers() {
    let addr = start_mock_master(200, alive_body()).await;
    let prober =
        ComputeMasterProber::new(&format!("http://{addr}"), Duration::from_secs(5)).unwrap();

    match prober.metrics().await {
        DetailedMetrics::ComputeMaster(m) => {
            assert_eq!(m.status, ServiceStatus::Up);
            assert_eq!(m.alive_workers, 2);
            assert_eq!(m.workers.len(), 2);
            assert_eq!(m.master_url.as_deref(), Some("spark://master:7077"));
            assert_eq!(m.total_cores, 16);
        }
        other => panic!("expected compute-master metrics, got {other:?}"),
    }
}

#[tokio::test]
async fn test_http_500_reports_down_with_code() {
    let addr = start_mock_master(500, "boom".to_string()).await;
    let prober =
        ComputeMasterProber::new(&format!("http://{addr}"), Duration::from_secs(5)).unwrap();

    let result = prober.check().await;
    assert_eq!(result.status, ServiceStatus::Down);
    assert_eq!(result.message.as_deref(), Some("HTTP 500"));
    assert!(result.latency_ms.is_none());

    match prober.metrics().await {
        DetailedMetrics::ComputeMaster(m) => {
            assert_eq!(m.status, ServiceStatus::Down);
            assert_eq!(m.message.as_deref(), Some("HTTP 500"));
            assert_eq!(m.alive_workers, 0);
            assert!(m.workers.is_empty());
        }
        other => panic!("expected compute-master metrics, got {other:?}"),
    }
}

#[tokio::test]
async fn test_standby_master_reports_not_alive() {
    let body = serde_json::json!({
        "url": "spark://master:7077",
        "workers": [],
        "status": "STANDBY"
    })
    .to_string();
    let addr = start_mock_master(200, body).await;
    let prober =
        ComputeMasterProber::new(&format!("http://{addr}"), Duration::from_secs(5)).unwrap();

    let result = prober.check().await;
    assert_eq!(result.status, ServiceStatus::Down);
    assert_eq!(result.message.as_deref(), Some("Status not ALIVE"));
}

#[tokio::test]
async fn test_unreachable_master_reports_down_within_timeout() {
    // Port 9 is unassigned on loopback; connection is refused immediately.
    let prober =
        ComputeMasterProber::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();

    let start = tokio::time::Instant::now();
    let result = prober.check().await;
    assert!(start.elapsed() < Duration::from_secs(5));
    assert_eq!(result.status, ServiceStatus::Down);
    assert!(result.message.is_some());
}
