//! Yieldkeeper Engine - Modded resource yields for a live simulation
//!
//! The Engine:
//! - Captures the baseline yields of every resource dispenser kind
//! - Derives target yields from the Modifiers and Overrides documents
//! - Keeps live dispensers on the derived yields and restores them on shutdown
//! - Serves a small admin API over HTTP

mod application;
mod domain;
mod infrastructure;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use tokio::sync::{mpsc, oneshot};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::application::services::{RateController, RateRepository};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::host_events::{run_controller, HostEvent};
use crate::infrastructure::http;
use crate::infrastructure::permissions::InMemoryPermissionRegistry;
use crate::infrastructure::persistence::DocumentStoreFactory;
use crate::infrastructure::rules_loader::load_rules;
use crate::infrastructure::state::AppState;
use crate::infrastructure::world::InMemoryWorld;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yieldkeeper_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Yieldkeeper Engine");

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!("Configuration loaded");
    tracing::info!("  Store: {:?}", config.store_backend);
    tracing::info!("  Data: {}", config.data_dir.display());
    tracing::info!("  Rules: {}", config.config_dir.display());

    let rules = load_rules(&config.config_dir).await?;
    let store = DocumentStoreFactory::new(config.clone()).create().await?;

    // Seed the host world
    let world = Arc::new(InMemoryWorld::new());
    if let Some(path) = &config.world_fixture {
        let specs = InMemoryWorld::load_fixture(path).await?;
        for spec in specs {
            world.spawn(spec);
        }
        tracing::info!("Seeded {} dispensers from {}", world.len(), path.display());
    }

    // Start the controller task
    let controller = RateController::new(
        rules,
        RateRepository::new(store),
        world.clone(),
        Arc::new(InMemoryPermissionRegistry::new()),
    );
    let (events, receiver) = mpsc::unbounded_channel();
    let controller_task = tokio::spawn(run_controller(controller, receiver));
    events.send(HostEvent::ServerInitialized)?;

    // Periodic save signal
    let save_worker = {
        let events = events.clone();
        let interval = Duration::from_secs(config.save_interval_secs);
        tokio::spawn(async move {
            tracing::info!("Starting save worker, every {}s", interval.as_secs());
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if events.send(HostEvent::ServerSave).is_err() {
                    break;
                }
            }
        })
    };

    let port = config.server_port;
    let state = Arc::new(AppState::new(events.clone(), world));

    // Build the router
    let app = Router::new()
        .route("/health", get(http::health_check))
        .merge(http::create_routes())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start the server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let server = axum::serve(listener, app);

    // Wait for shutdown signal (Ctrl+C)
    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received, restoring resource rates...");
        }
    }

    save_worker.abort();

    let (reply, restored) = oneshot::channel();
    if events.send(HostEvent::Unload { reply }).is_ok() {
        match restored.await {
            Ok(Some(report)) => tracing::info!("Restored {} dispensers of {}", report.updated, report.total),
            Ok(None) => tracing::info!("Nothing to restore"),
            Err(_) => tracing::warn!("Rate controller stopped before restoring"),
        }
    }
    controller_task.await?;

    Ok(())
}
