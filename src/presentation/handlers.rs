// HTTP request handlers
use crate::domain::process::Process;
use crate::domain::reading::Reading;
use crate::domain::stats::Stats;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    response::IntoResponse,
    Json,
};
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

#[derive(Deserialize)]
pub struct RangeQuery {
    pub hours: Option<i64>,
}

/// Operator-set target values for the four channels. Non-numeric input is
/// rejected by deserialization before it can reach the store.
#[derive(Deserialize)]
pub struct TargetParams {
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub speed: f64,
}

impl TargetParams {
    fn into_reading(self) -> Reading {
        Reading::target(self.temperature, self.humidity, self.pressure, self.speed)
    }
}

#[derive(Serialize)]
pub struct StartedProcess {
    pub id: String,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Snapshot of every process, running or stopped
pub async fn list_processes(State(state): State<Arc<AppState>>) -> Json<Vec<Process>> {
    Json(state.store.snapshot())
}

/// Start a new process around the submitted target
pub async fn start_process(
    State(state): State<Arc<AppState>>,
    Json(params): Json<TargetParams>,
) -> impl IntoResponse {
    let id = state.store.start(params.into_reading());
    (StatusCode::CREATED, Json(StartedProcess { id }))
}

/// Stop a process; its record stays resident
pub async fn stop_process(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> StatusCode {
    if state.store.stop(&id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// Replace a process target; takes effect on the next tick
pub async fn update_target(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(params): Json<TargetParams>,
) -> StatusCode {
    if state.store.update_target(&id, params.into_reading()) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// Cumulative production counters
pub async fn production_stats(State(state): State<Arc<AppState>>) -> Json<Stats> {
    Json(state.stats.snapshot())
}

/// History view data, proxied from the remote collector
pub async fn parameter_history(
    Query(query): Query<RangeQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Reading>>, StatusCode> {
    let Some(hours) = positive_hours(query.hours) else {
        return Err(StatusCode::BAD_REQUEST);
    };

    match state.history_service.recent_readings(hours).await {
        Ok(readings) => Ok(Json(readings)),
        Err(e) => {
            tracing::warn!("failed to fetch history from collector: {e}");
            // Degrade to an empty chart rather than failing the page.
            Ok(Json(Vec::new()))
        }
    }
}

/// Live feed as server-sent events: one `reading` event per process per
/// tick, plus `collector_failure` events so a dashboard can flag collector
/// health instead of failures staying buried in the log
pub async fn live_readings(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut events = state.simulation.subscribe_events();
    let mut failures = state.simulation.subscribe_failures();
    let stream = async_stream::stream! {
        loop {
            let next = tokio::select! {
                tick = events.recv() => match tick {
                    Ok(tick) => match Event::default().event("reading").json_data(&tick) {
                        Ok(event) => Some(event),
                        Err(e) => {
                            tracing::warn!("failed to encode tick event: {e}");
                            None
                        }
                    },
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("live stream lagged, dropped {skipped} events");
                        None
                    }
                    Err(RecvError::Closed) => break,
                },
                failure = failures.recv() => match failure {
                    Ok(failure) => Some(
                        Event::default()
                            .event("collector_failure")
                            .data(failure.to_string()),
                    ),
                    Err(RecvError::Lagged(_)) => None,
                    Err(RecvError::Closed) => break,
                },
            };
            if let Some(event) = next {
                yield Ok(event);
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

// The history period must be a positive whole number of hours, otherwise the
// upstream request is not issued at all. Absent means the default window.
fn positive_hours(raw: Option<i64>) -> Option<u32> {
    match raw {
        None => Some(24),
        Some(hours) if hours > 0 => u32::try_from(hours).ok(),
        Some(_) => None,
    }
}
