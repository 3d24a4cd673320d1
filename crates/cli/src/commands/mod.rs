//! CLI subcommands.

pub mod items;
pub mod process;

use lendstock_client::{ApiConfig, ApiError, ConfigError, InventoryApiClient};
use thiserror::Error;

/// Errors that can occur while setting up a backend connection.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// HTTP client could not be created.
    #[error(transparent)]
    Client(#[from] ApiError),
}

/// Build a backend client from the environment.
pub fn connect() -> Result<InventoryApiClient, ConnectError> {
    let config = ApiConfig::from_env()?;
    tracing::debug!(base_url = %config.base_url, "Connecting to inventory backend");
    Ok(InventoryApiClient::new(&config)?)
}
