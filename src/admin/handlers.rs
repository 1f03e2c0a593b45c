use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::admin::AdminRoute;
use crate::calls::CallFilter;
use crate::http::server::AppState;

/// Run an administrative operation. `body` is the full request body.
pub fn handle(route: AdminRoute, state: &AppState, body: &[u8]) -> Response {
    match route {
        AdminRoute::Alive => alive(state),
        AdminRoute::Stop => stop(state),
        AdminRoute::Calls => calls(state, body),
        AdminRoute::CallsCount => calls_count(state),
        AdminRoute::CallsReset => calls_reset(state),
    }
}

fn alive(state: &AppState) -> Response {
    (StatusCode::OK, state.impersonating.to_string()).into_response()
}

fn stop(state: &AppState) -> Response {
    tracing::info!("Stopping server");
    state.shutdown.trigger();
    (StatusCode::OK, "Stopping Server").into_response()
}

fn calls(state: &AppState, body: &[u8]) -> Response {
    let records = match CallFilter::from_body(body) {
        Some(filter) => {
            tracing::debug!(filter = ?filter, "Filtering call history");
            state.calls.query(&filter)
        }
        None => state.calls.all(),
    };
    Json(records).into_response()
}

fn calls_count(state: &AppState) -> Response {
    Json(state.calls.count()).into_response()
}

fn calls_reset(state: &AppState) -> Response {
    state.calls.reset();
    state.config.snapshot().reset_counters();
    tracing::info!("Call history and reply sequences reset");
    (StatusCode::OK, "Calls were reset").into_response()
}
