//! Backend entry-point: loads settings, wires adapters into the services,
//! prepares the indices, and serves the HTTP API.

mod server;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use appstore::domain::{AppService, UserService};
use appstore::inbound::http::health::HealthState;
use appstore::inbound::http::state::HttpState;
use appstore::inbound::http::upload_form::UploadLimits;

use server::{AppSettings, Backends, ServerConfig, build_backends, create_server, ensure_indices};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err.to_string()))?;
    let bind_addr: SocketAddr = settings.bind_addr().parse().map_err(|err| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid bind address {}: {err}", settings.bind_addr()),
        )
    })?;

    let Backends {
        index,
        media,
        payments,
    } = build_backends(&settings)?;
    ensure_indices(index.as_ref()).await?;

    let apps = AppService::new(Arc::clone(&index), media, payments);
    let users = UserService::new(index);
    let http_state = HttpState::new(Arc::new(apps), Arc::new(users)).with_upload_limits(
        UploadLimits {
            media_bytes: settings.max_media_bytes(),
            ..UploadLimits::default()
        },
    );

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, http_state, ServerConfig::new(bind_addr))?;
    info!(%bind_addr, "server listening");
    server.await
}
