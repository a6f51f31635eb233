//! Wayfare access-control API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod auth;
mod dev_seed;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use tracing::info;
use wayfare_core::AppError;

use crate::api_config::{ApiConfig, StoreConfig};
use crate::api_services::RepositorySet;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    api_config::init_tracing();

    let config = ApiConfig::load()?;

    let repositories = match &config.store {
        StoreConfig::Postgres { database_url } => {
            let pool =
                api_services::connect_and_migrate(database_url, config.authz_timeout).await?;
            if config.migrate_only {
                info!("database migrations applied successfully");
                return Ok(());
            }
            RepositorySet::postgres(&pool)
        }
        StoreConfig::Memory => {
            info!("using in-memory access store; data is lost on shutdown");
            RepositorySet::memory()?
        }
    };

    if let Some(admin) = &config.bootstrap_admin {
        dev_seed::ensure_bootstrap_admin(&repositories, admin).await?;
    }

    let app_state = api_services::build_app_state(&repositories, &config)?;
    let app = api_router::build_router(app_state, &config.frontend_url)?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "wayfare-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
