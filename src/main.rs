use std::net::SocketAddr;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::{AppConfig, ConfigLoader};
use payroll_engine::telemetry;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    telemetry::init_tracing(&config)?;

    let loader = ConfigLoader::load(&config.config_dir)?;
    let state = AppState::from_app_config(&config, loader)?;

    let addr: SocketAddr = config.bind_addr;
    info!(
        stage = "app",
        %addr,
        env = %config.environment.as_str(),
        source_policy = %config.source_policy,
        backend = config.backend.as_ref().map(|b| b.base_url.as_str()).unwrap_or("none"),
        "starting HTTP server"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, create_router(state))
        .await
        .map_err(|err| err.into())
}
