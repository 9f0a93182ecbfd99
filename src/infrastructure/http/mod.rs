//! HTTP admin API routes

mod command_routes;
mod dispenser_routes;
mod status_routes;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::infrastructure::state::AppState;

pub use status_routes::health_check;

/// Create all API routes
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/status", get(status_routes::get_status))
        .route("/api/rates/baseline", get(status_routes::get_baseline_rates))
        .route("/api/rates/derived", get(status_routes::get_derived_rates))
        .route("/api/dispensers", post(dispenser_routes::spawn_dispenser))
        .route("/api/dispensers/{id}", get(dispenser_routes::get_dispenser))
        .route("/api/commands/showdata", post(command_routes::show_data))
}
