//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (tracing, snapshot timeouts)
//! - Serve with graceful shutdown
//!
//! # Design Decisions
//! - Snapshot routes sit behind a request timeout; stream routes are
//!   long-lived and deliberately exempt
//! - Handlers receive everything through `AppState`; the server owns no
//!   probing logic of its own

use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::health::aggregator::Aggregator;
use crate::health::publisher::ReportHub;
use crate::health::report::{DetailedHealthReport, HealthReport};
use crate::http::handlers;
use crate::http::sse;
use crate::ingest::IngestService;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
    pub summary: Arc<ReportHub<HealthReport>>,
    pub detailed: Arc<ReportHub<DetailedHealthReport>>,
    /// Snapshot freshness window; one scheduler tick.
    pub freshness: Duration,
    pub ingest: Arc<IngestService>,
}

/// Build the full application router.
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    let snapshots = Router::new()
        .route("/health", get(handlers::health_summary))
        .route("/health/details", get(handlers::health_details))
        .route("/health/{service}", get(handlers::service_health))
        .route(
            "/records",
            get(handlers::list_records).post(handlers::create_record),
        )
        .layer(TimeoutLayer::new(request_timeout));

    let streams = Router::new()
        .route("/health/stream", get(sse::health_stream))
        .route("/health/details/stream", get(sse::details_stream));

    snapshots
        .merge(streams)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// HTTP server for the health service.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(state: AppState, request_timeout: Duration) -> Self {
        Self {
            router: build_router(state, request_timeout),
        }
    }

    /// Run the server, accepting connections on the given listener until the
    /// shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server received shutdown signal");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
