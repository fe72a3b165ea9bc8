//! # relaydashd — relay dashboard daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialise `tracing`
//! - Construct the hub adapters (Socket.IO channel, REST schedule API)
//! - Construct the dashboard controller, injecting the adapters via port traits
//! - Build the axum router around the controller handle
//! - Bind to a TCP port and serve until Ctrl-C
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no dashboard logic belongs here.

mod config;

use relaydash_adapter_http_axum::state::AppState;
use relaydash_adapter_rest_reqwest::RestScheduleApi;
use relaydash_app::controller::Controller;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    let filter = EnvFilter::try_new(&config.logging.filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Hub adapters
    let (emitter, connection) = relaydash_adapter_socketio::channel(config.socketio())?;
    let api = RestScheduleApi::new(&config.rest())?;

    // Controller
    let (controller, handle) = Controller::new(emitter, api, config.controller());
    let controller_task = tokio::spawn(controller.run());
    let hub_task = tokio::spawn(connection.run(handle.clone()));

    // HTTP
    let state = AppState::new(handle, config.dashboard.refresh_seconds);
    let app = relaydash_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, hub = %config.hub.url, "relaydashd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The hub task holds a handle; stopping it lets the controller drain.
    hub_task.abort();
    controller_task.await?;
    tracing::info!("relaydashd stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "cannot listen for ctrl-c, serving until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
