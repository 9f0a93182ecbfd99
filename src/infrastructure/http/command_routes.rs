//! Operational commands
//!
//! Callers are authenticated in front of this API. The host or proxy that
//! does so forwards the caller's granted permissions in
//! [`GRANTED_PERMISSIONS_HEADER`]; commands refuse callers without the admin
//! permission.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::application::dto::CommandState;
use crate::application::ports::outbound::ADMIN_PERMISSION;
use crate::infrastructure::host_events::HostEvent;
use crate::infrastructure::state::AppState;

/// Comma-separated permissions granted to the caller
pub const GRANTED_PERMISSIONS_HEADER: &str = "x-granted-permissions";

#[derive(Debug, Serialize)]
pub struct CommandResponse {
    pub state: CommandState,
}

fn is_granted(headers: &HeaderMap, permission: &str) -> bool {
    headers
        .get_all(GRANTED_PERMISSIONS_HEADER)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|granted| granted.trim() == permission)
}

/// Save baseline and derived rates right now
pub async fn show_data(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<CommandResponse>), (StatusCode, String)> {
    if !is_granted(&headers, ADMIN_PERMISSION) {
        tracing::warn!("Rejected showdata command without {}", ADMIN_PERMISSION);
        return Err((
            StatusCode::FORBIDDEN,
            format!("Missing permission {ADMIN_PERMISSION}"),
        ));
    }

    let outcome = state
        .ask(|reply| HostEvent::Command { reply })
        .await
        .map_err(|e| (StatusCode::SERVICE_UNAVAILABLE, e.to_string()))?;

    let status = match outcome {
        CommandState::Completed => StatusCode::OK,
        CommandState::NotReady => StatusCode::CONFLICT,
    };
    Ok((status, Json(CommandResponse { state: outcome })))
}
