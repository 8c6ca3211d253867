//! Integration tests for the snapshot HTTP surface.

use std::sync::Arc;
use std::time::Duration;

use pulsewatch::health::probe::Probe;

mod common;
use common::{spawn_app, stub_state, StubProbe};

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

#[tokio::test]
async fn test_all_healthy_returns_200_in_canonical_order() {
    let probes: Vec<Arc<dyn Probe>> = vec![
        StubProbe::healthy("database"),
        StubProbe::healthy("broker"),
        StubProbe::healthy("compute-master"),
    ];
    let addr = spawn_app(stub_state(probes, Duration::from_secs(60))).await;

    let res = client()
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["overall"], "UP");
    let services = body["services"].as_array().unwrap();
    let names: Vec<&str> = services
        .iter()
        .map(|s| s["service"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["database", "broker", "compute-master"]);
    for service in services {
        assert_eq!(service["status"], "UP");
        assert!(service.get("latencyMs").is_some());
        assert!(service.get("message").is_none());
    }
}

#[tokio::test]
async fn test_broker_failure_returns_207_with_message() {
    let probes: Vec<Arc<dyn Probe>> = vec![
        StubProbe::healthy("database"),
        StubProbe::failing("broker"),
        StubProbe::healthy("compute-master"),
    ];
    let addr = spawn_app(stub_state(probes, Duration::from_secs(60))).await;

    let res = client()
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 207);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["overall"], "DEGRADED");
    let broker = &body["services"][1];
    assert_eq!(broker["service"], "broker");
    assert_eq!(broker["status"], "DOWN");
    assert!(!broker["message"].as_str().unwrap().is_empty());
    assert!(broker.get("latencyMs").is_none());
}

#[tokio::test]
async fn test_detailed_report_tagged_by_service() {
    let probes: Vec<Arc<dyn Probe>> = vec![
        StubProbe::healthy("database"),
        StubProbe::healthy("broker"),
        StubProbe::failing("compute-master"),
    ];
    let addr = spawn_app(stub_state(probes, Duration::from_secs(60))).await;

    let res = client()
        .get(format!("http://{addr}/health/details"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 207);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["overall"], "DEGRADED");
    let services = body["services"].as_array().unwrap();
    assert_eq!(services[0]["service"], "database");
    assert_eq!(services[0]["version"], "PostgreSQL 16.3");
    assert_eq!(services[1]["service"], "broker");
    assert_eq!(services[2]["service"], "compute-master");
    assert_eq!(services[2]["status"], "DOWN");
    // Fields inapplicable on failure are omitted, not null.
    assert!(services[2].get("masterUrl").is_none());
}

#[tokio::test]
async fn test_single_service_endpoints() {
    let probes: Vec<Arc<dyn Probe>> = vec![
        StubProbe::healthy("database"),
        StubProbe::failing("broker"),
        StubProbe::healthy("compute-master"),
    ];
    let addr = spawn_app(stub_state(probes, Duration::from_secs(60))).await;
    let client = client();

    let res = client
        .get(format!("http://{addr}/health/database"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["service"], "database");
    assert_eq!(body["status"], "UP");

    let res = client
        .get(format!("http://{addr}/health/broker"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 503);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "DOWN");
    assert_eq!(body["message"], "injected failure");

    let res = client
        .get(format!("http://{addr}/health/cache"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
}

#[tokio::test]
async fn test_snapshots_share_one_probe_run_within_window() {
    let database = StubProbe::healthy("database");
    let broker = StubProbe::healthy("broker");
    let compute = StubProbe::healthy("compute-master");
    let probes: Vec<Arc<dyn Probe>> = vec![database.clone(), broker.clone(), compute.clone()];
    let addr = spawn_app(stub_state(probes, Duration::from_secs(60))).await;
    let client = client();

    for _ in 0..5 {
        let res = client
            .get(format!("http://{addr}/health"))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
    }

    // First request probed; the other four hit the freshness window.
    assert_eq!(database.check_count(), 1);
    assert_eq!(broker.check_count(), 1);
    assert_eq!(compute.check_count(), 1);
}

#[tokio::test]
async fn test_per_service_endpoint_always_probes_fresh() {
    let database = StubProbe::healthy("database");
    let probes: Vec<Arc<dyn Probe>> = vec![database.clone()];
    let addr = spawn_app(stub_state(probes, Duration::from_secs(60))).await;
    let client = client();

    for _ in 0..3 {
        client
            .get(format!("http://{addr}/health/database"))
            .send()
            .await
            .unwrap();
    }
    assert_eq!(database.check_count(), 3);
}

#[tokio::test]
async fn test_null_record_payload_rejected() {
    let probes: Vec<Arc<dyn Probe>> = vec![StubProbe::healthy("database")];
    let addr = spawn_app(stub_state(probes, Duration::from_secs(60))).await;

    let res = client()
        .post(format!("http://{addr}/records"))
        .header("content-type", "application/json")
        .body("null")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
}
