//! Backend entry-point: loads configuration, seeds the bootstrap admin, and
//! serves the REST API until interrupted.

mod server;

use actix_web::web;
use color_eyre::eyre::{WrapErr, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use portfolio_cms::inbound::http::health::HealthState;
use portfolio_cms::inbound::http::session_config::{BuildMode, session_settings_from_env};
use server::{ServerConfig, ServerSettings, create_server};

#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|e| eyre!("failed to load configuration: {e}"))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("invalid session configuration")?;
    info!(fingerprint = %session.key_fingerprint(), "session key loaded");
    let config =
        ServerConfig::from_settings(&settings, session).wrap_err("invalid server settings")?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config).await?;

    let handle = server.handle();
    actix_web::rt::spawn(async move {
        if actix_web::rt::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested; draining");
            health_state.mark_draining();
            handle.stop(true).await;
        }
    });

    server.await?;
    Ok(())
}
