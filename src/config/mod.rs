//! Configuration management for indieserv
//!
//! Settings are layered, lowest to highest priority:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables
//!
//! # Environment Variables
//!
//! Any setting can be overridden with `INDIESERV__<section>__<key>`:
//! - `INDIESERV__SERVER__BIND_ADDR=0.0.0.0:9000`
//! - `INDIESERV__SITE__BASE_URL=https://blog.example`
//!
//! The admin token is a secret and is only read from `INDIESERV_ADMIN_TOKEN`.
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/indieserv.toml`.
//! This can be overridden using the `INDIESERV_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use models::{Config, ServerConfig, SiteConfig};
pub use validation::ValidationError;

use axum::http::Uri;
use thiserror::Error;

use crate::mention::SiteRoutes;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Route table for the configured site
    pub fn site_routes(&self) -> Result<SiteRoutes, ValidationError> {
        let base: Uri = self
            .site
            .base_url
            .parse()
            .map_err(|_| ValidationError::InvalidBaseUrl {
                url: self.site.base_url.clone(),
            })?;
        Ok(SiteRoutes::new(&base, self.site.entry_path_prefix.clone()))
    }
}
