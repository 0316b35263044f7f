//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};

use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Json, Response,
    },
};
use futures::stream::{self, Stream, StreamExt};
use tracing::{info, warn};

use super::{
    responses::{ApiResponse, DurationUpdateRequest, ErrorResponse, HealthResponse, StatusResponse},
    state::ApiState,
};
use crate::machine::{TimerEvent, TimerSnapshot};

/// Handle POST /pause - Freeze the countdown
pub async fn pause_handler(State(state): State<Arc<ApiState>>) -> Json<ApiResponse> {
    let timer = state.send("pause", TimerEvent::Pause);
    info!("Pause endpoint called - timer is {}", timer.state);
    Json(ApiResponse::new("Pause requested", timer))
}

/// Handle POST /unpause - Resume the countdown
pub async fn unpause_handler(State(state): State<Arc<ApiState>>) -> Json<ApiResponse> {
    let timer = state.send("unpause", TimerEvent::Unpause);
    info!("Unpause endpoint called - timer is {}", timer.state);
    Json(ApiResponse::new("Unpause requested", timer))
}

/// Handle POST /reset - Restart the countdown from zero
pub async fn reset_handler(State(state): State<Arc<ApiState>>) -> Json<ApiResponse> {
    let timer = state.send("reset", TimerEvent::Reset);
    info!("Reset endpoint called - timer is {}", timer.state);
    Json(ApiResponse::new("Timer reset", timer))
}

/// Handle POST /duration - Shift the duration by a signed number of seconds
pub async fn duration_handler(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<DurationUpdateRequest>,
) -> Response {
    send_checked(&state, "duration", TimerEvent::DurationUpdate { value: request.value })
}

/// Handle POST /events - Send any timer event; unknown event types are ignored
pub async fn event_handler(
    State(state): State<Arc<ApiState>>,
    Json(event): Json<TimerEvent>,
) -> Response {
    send_checked(&state, "event", event)
}

fn send_checked(state: &ApiState, action: &str, event: TimerEvent) -> Response {
    if let TimerEvent::DurationUpdate { value } = event {
        if !value.is_finite() {
            warn!("Rejected duration update with non-finite value {}", value);
            let body = ErrorResponse {
                error: format!("duration delta must be a finite number, got {}", value),
            };
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response();
        }
    }

    let timer = state.send(action, event);
    info!("Event {:?} sent - timer is {}", event, timer.state);
    Json(ApiResponse::new(format!("{:?} accepted", event), timer)).into_response()
}

/// Handle GET /status - Return the current timer snapshot
pub async fn status_handler(State(state): State<Arc<ApiState>>) -> Json<StatusResponse> {
    let snapshot = state.engine.snapshot();
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        state: snapshot.state,
        elapsed: snapshot.context.elapsed,
        duration: snapshot.context.duration,
        remaining: snapshot.remaining(),
        interval: snapshot.context.interval,
        uptime: state.get_uptime(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /stream - Server-sent events carrying every new snapshot
pub async fn stream_handler(
    State(state): State<Arc<ApiState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut rx = state.engine.watch();
    let current = rx.borrow_and_update().clone();

    let updates = stream::unfold(rx, |mut rx| async move {
        rx.changed().await.ok()?;
        let snapshot = rx.borrow_and_update().clone();
        Some((snapshot, rx))
    });

    let events = stream::once(async move { current })
        .chain(updates)
        .map(|snapshot| Ok(snapshot_event(&snapshot)));

    Sse::new(events).keep_alive(KeepAlive::default())
}

fn snapshot_event(snapshot: &TimerSnapshot) -> Event {
    Event::default()
        .event(snapshot.state.to_string())
        .json_data(snapshot)
        .unwrap_or_else(|e| {
            warn!("Failed to encode snapshot: {}", e);
            Event::default().comment("snapshot unavailable")
        })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
