//! Status and rate table routes

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::application::dto::ControllerStatus;
use crate::domain::value_objects::RateTable;
use crate::infrastructure::host_events::{HostEvent, TableChoice};
use crate::infrastructure::state::AppState;

pub async fn health_check() -> &'static str {
    "OK"
}

/// Lifecycle state and table sizes
pub async fn get_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ControllerStatus>, (StatusCode, String)> {
    state
        .ask(|reply| HostEvent::Status { reply })
        .await
        .map(Json)
        .map_err(|e| (StatusCode::SERVICE_UNAVAILABLE, e.to_string()))
}

async fn snapshot(state: &AppState, table: TableChoice) -> Result<Json<RateTable>, (StatusCode, String)> {
    state
        .ask(|reply| HostEvent::Snapshot { table, reply })
        .await
        .map(Json)
        .map_err(|e| (StatusCode::SERVICE_UNAVAILABLE, e.to_string()))
}

pub async fn get_baseline_rates(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RateTable>, (StatusCode, String)> {
    snapshot(&state, TableChoice::Baseline).await
}

pub async fn get_derived_rates(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RateTable>, (StatusCode, String)> {
    snapshot(&state, TableChoice::Derived).await
}
