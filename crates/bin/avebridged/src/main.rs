//! # avebridged: avebridge daemon
//!
//! Composition root that connects to the hub and keeps the device cache
//! current.
//!
//! ## Responsibilities
//! - Parse configuration (env vars, config file)
//! - Initialize logging
//! - Optionally validate the hub through the HTTP bridge
//! - Construct the websocket transport and the session
//! - Log every device change
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no protocol logic belongs here.

mod config;

use avebridge_adapter_websocket::WsTransport;
use avebridge_app::session::Session;
use avebridge_domain::event::DeviceChange;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    let settings = config.hub.settings.clone();
    tracing::info!(
        host = %settings.host,
        port = config.hub.port,
        lights = settings.fetch_lights,
        sensors = settings.fetch_sensors,
        areas = settings.fetch_sensor_areas,
        "starting avebridged"
    );

    if config.startup.validate_bridge
        && let Err(err) = avebridge_adapter_bridge_http::validate(&settings.host).await
    {
        tracing::error!(%err, host = %settings.host, "hub did not answer the http bridge");
        return Err(err.into());
    }

    let session = Session::new(WsTransport::new(config.websocket()), settings);
    session.subscribe_binary_sensor_changes(log_change);
    session.subscribe_switch_changes(log_change);
    let handle = session.start();

    shutdown_signal().await;
    session.close();
    handle.await?;

    Ok(())
}

fn log_change(change: &DeviceChange) {
    let device = change.device();
    tracing::info!(
        unique_id = %device.unique_id,
        name = %device.name,
        status = ?device.status,
        created = change.is_created(),
        "device changed"
    );
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received ctrl-c, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
