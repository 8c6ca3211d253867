//! Pulsewatch service binary.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────┐
//!                       │                 PULSEWATCH                   │
//!                       │                                              │
//!   GET /health ────────┼─▶ http ──▶ ReportHub (freshness window)      │
//!   GET /health/stream ─┼─▶ sse  ◀── broadcast fan-out ◀─┐             │
//!                       │                                │             │
//!                       │   scheduler tick ──▶ Aggregator┘             │
//!                       │                       │                      │
//!                       │         ┌─────────────┼─────────────┐        │
//!                       │         ▼             ▼             ▼        │
//!                       │   DatabaseProber BrokerProber ComputeMaster  │
//!                       │      (sqlx)      (rdkafka)     (reqwest)     │
//!                       └─────────┼─────────────┼─────────────┼────────┘
//!                                 ▼             ▼             ▼
//!                             PostgreSQL     Kafka        Spark master
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pulsewatch::config::{load_config, AppConfig};
use pulsewatch::health::broker::BrokerProber;
use pulsewatch::health::compute::ComputeMasterProber;
use pulsewatch::health::database::DatabaseProber;
use pulsewatch::health::probe::Probe;
use pulsewatch::health::{Aggregator, HealthScheduler, ReportHub};
use pulsewatch::http::{AppState, HttpServer};
use pulsewatch::ingest::{EventPublisher, IngestService, KafkaPublisher, NoopPublisher, RecordStore};
use pulsewatch::lifecycle::Shutdown;
use pulsewatch::observability;

#[derive(Parser)]
#[command(
    name = "pulsewatch",
    about = "Aggregated health for database, broker and compute-master backends"
)]
struct Args {
    /// Path to a TOML configuration file; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.observability.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("pulsewatch v0.1.0 starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        probe_timeout_secs = config.health.probe_timeout_secs,
        tick_interval_secs = config.health.tick_interval_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let probe_timeout = config.health.probe_timeout();
    let database = Arc::new(DatabaseProber::new(&config.database.url, probe_timeout)?);
    let broker = Arc::new(BrokerProber::new(
        &config.broker.bootstrap_servers,
        probe_timeout,
    ));
    let compute = Arc::new(ComputeMasterProber::new(
        &config.compute_master.url,
        probe_timeout,
    )?);

    let store = RecordStore::new(database.pool());
    let publisher: Arc<dyn EventPublisher> = if config.ingest.publish_events {
        match KafkaPublisher::new(&config.broker.bootstrap_servers, &config.ingest.topic) {
            Ok(publisher) => Arc::new(publisher),
            Err(error) => {
                tracing::warn!(%error, "event publisher unavailable, ingest events disabled");
                Arc::new(NoopPublisher)
            }
        }
    } else {
        Arc::new(NoopPublisher)
    };
    let ingest = Arc::new(IngestService::new(store, publisher));
    ingest.ensure_schema().await;

    // Canonical service order: database, broker, compute-master.
    let probes: Vec<Arc<dyn Probe>> = vec![database, broker, compute];
    let aggregator = Arc::new(Aggregator::new(probes));
    let summary = Arc::new(ReportHub::new(16));
    let detailed = Arc::new(ReportHub::new(16));

    let shutdown = Arc::new(Shutdown::new());
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move { shutdown.listen_for_signals().await });
    }

    let scheduler = HealthScheduler::new(
        aggregator.clone(),
        summary.clone(),
        detailed.clone(),
        config.health.tick_interval(),
    );
    tokio::spawn(scheduler.run(shutdown.subscribe()));

    let state = AppState {
        aggregator,
        summary,
        detailed,
        freshness: config.health.tick_interval(),
        ingest,
    };
    let server = HttpServer::new(
        state,
        Duration::from_secs(config.listener.request_timeout_secs),
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
