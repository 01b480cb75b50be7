//! Configuration loading and controller wiring shared by all commands

use crate::cli::ConnectionArgs;
use crate::client::{HttpProxyClient, ProxyApi};
use crate::config::ConsoleConfig;
use crate::session::{SessionController, SessionSettings};
use std::sync::Arc;

/// Load configuration with CLI overrides
///
/// A missing config file is not an error; defaults are used instead.
pub fn load_config_with_overrides(
    args: &ConnectionArgs,
) -> Result<ConsoleConfig, Box<dyn std::error::Error>> {
    let mut config = if args.config.exists() {
        ConsoleConfig::load(Some(&args.config))?
    } else {
        tracing::debug!("Config file not found, using defaults");
        ConsoleConfig::default()
    };

    config = config.with_env_overrides();

    if let Some(ref url) = args.api_url {
        config.api.base_url = url.clone();
    }
    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }

    config.validate()?;
    Ok(config)
}

/// HTTP client for the configured proxy
pub fn build_client(
    config: &ConsoleConfig,
) -> Result<Arc<dyn ProxyApi>, Box<dyn std::error::Error>> {
    let client = HttpProxyClient::new(&config.api.base_url, config.api.timeout_seconds)?;
    Ok(Arc::new(client))
}

/// Session controller talking to the configured proxy
pub fn build_controller(
    config: &ConsoleConfig,
) -> Result<SessionController, Box<dyn std::error::Error>> {
    let api = build_client(config)?;
    Ok(SessionController::new(api, SessionSettings::from(config)))
}
