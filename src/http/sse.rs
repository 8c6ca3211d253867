//! SSE stream handlers.
//!
//! # Design Decisions
//! - Subscribers attach to the scheduler's broadcast fan-out; attaching never
//!   triggers probing
//! - Event ids are a per-session counter starting at 0: reconnecting starts
//!   a fresh sequence with no replay of missed events
//! - A lagged subscriber skips ahead to current reports instead of erroring;
//!   a degraded report is still a report, so streams never terminate because
//!   a backend is down

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::stream::Stream;
use serde::Serialize;
use tokio::sync::broadcast;

use crate::http::server::AppState;

/// GET /health/stream
pub async fn health_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.summary.subscribe();
    Sse::new(report_stream(rx, "health")).keep_alive(KeepAlive::default())
}

/// GET /health/details/stream
pub async fn details_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.detailed.subscribe();
    Sse::new(report_stream(rx, "health-details")).keep_alive(KeepAlive::default())
}

fn report_stream<T>(
    rx: broadcast::Receiver<Arc<T>>,
    event_name: &'static str,
) -> impl Stream<Item = Result<Event, Infallible>>
where
    T: Serialize + Send + Sync + 'static,
{
    futures_util::stream::unfold((rx, 0u64), move |(mut rx, seq)| async move {
        loop {
            match rx.recv().await {
                Ok(report) => {
                    let event = match Event::default()
                        .id(seq.to_string())
                        .event(event_name)
                        .json_data(report.as_ref())
                    {
                        Ok(event) => event,
                        Err(error) => {
                            tracing::error!(%error, "failed to serialize stream event");
                            return None;
                        }
                    };
                    return Some((Ok(event), (rx, seq + 1)));
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "stream subscriber lagged, skipping to current");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    })
}
