//! Dispenser routes - host-side spawning into the in-memory world

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::value_objects::EntityId;
use crate::infrastructure::host_events::HostEvent;
use crate::infrastructure::state::AppState;
use crate::infrastructure::world::{DispenserSpec, SimDispenser};

#[derive(Debug, Serialize)]
pub struct SpawnResponse {
    pub id: EntityId,
}

/// Spawn a dispenser and tell the controller about it
pub async fn spawn_dispenser(
    State(state): State<Arc<AppState>>,
    Json(spec): Json<DispenserSpec>,
) -> Result<(StatusCode, Json<SpawnResponse>), (StatusCode, String)> {
    if !(0.0..=1.0).contains(&spec.fraction_remaining) {
        return Err((
            StatusCode::BAD_REQUEST,
            "fraction_remaining must be between 0 and 1".to_string(),
        ));
    }

    let id = state.world.spawn(spec);
    state
        .notify(HostEvent::EntitySpawned(id))
        .map_err(|e| (StatusCode::SERVICE_UNAVAILABLE, e.to_string()))?;

    Ok((StatusCode::CREATED, Json(SpawnResponse { id })))
}

pub async fn get_dispenser(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SimDispenser>, (StatusCode, String)> {
    let uuid = Uuid::parse_str(&id)
        .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid entity ID".to_string()))?;

    state
        .world
        .dispenser(EntityId::from(uuid))
        .map(Json)
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Dispenser not found".to_string()))
}
