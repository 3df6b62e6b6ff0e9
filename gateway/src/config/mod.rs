//! Configuration module for the Empath gateway
//!
//! This module handles server configuration from various sources: .env files, YAML files,
//! and environment variables. Priority: YAML > ENV vars > .env values > defaults.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable loading
//! - `merge`: Merging YAML and environment configurations
//! - `validation`: Configuration validation logic
//! - `utils`: Utility functions for configuration parsing
//!
//! # Example
//! ```rust,no_run
//! use empath_gateway::config::ServerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // Load from YAML file with environment variable overrides
//! let config_path = PathBuf::from("config.yaml");
//! let config = ServerConfig::from_file(&config_path)?;
//!
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use thiserror::Error;

use crate::core::selector::WindowPolicy;
use crate::core::session::DEFAULT_FETCH_LIMIT;
use crate::core::view_state::DisplayLimit;
use crate::core::wheel::{DEFAULT_CANVAS_SIZE, RadialPolicy, RenderOptions};

mod env;
mod merge;
mod utils;
mod validation;
mod yaml;

pub use yaml::YamlConfig;

/// Default backend base URL.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000/api/v1";

/// Configuration errors raised while merging or validating.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// TLS configuration for HTTPS
#[derive(Debug, Clone)]
pub struct TlsConfig {
    /// Path to the TLS certificate file (PEM format)
    pub cert_path: PathBuf,
    /// Path to the TLS private key file (PEM format)
    pub key_path: PathBuf,
}

/// Server configuration
///
/// Contains all configuration needed to run the gateway:
/// - Server settings (host, port, TLS)
/// - Conversation backend (URL, token, timeout, demo mode)
/// - Selection and wheel policies
/// - Session feed cache
/// - Security settings (CORS, rate limiting)
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    // TLS configuration (optional)
    pub tls: Option<TlsConfig>,

    // Conversation backend
    pub backend_url: String,
    /// Bearer token for the backend; zeroized on drop
    pub backend_token: Option<String>,
    pub backend_timeout_seconds: u64,
    /// Serve synthetic placeholder sessions instead of calling the backend
    pub demo_mode: bool,

    // Selection
    pub window_policy: WindowPolicy,
    pub fetch_limit: u16,
    pub default_display_limit: DisplayLimit,

    // Wheel
    pub canvas_size: f64,
    pub radial_policy: RadialPolicy,

    // Session feed
    /// Serve the last good result (flagged stale) when the backend fails
    pub stale_on_error: bool,
    pub cache_ttl_seconds: u64,
    pub cache_capacity: u64,

    // Security settings
    /// CORS allowed origins (comma-separated list or "*" for all)
    pub cors_allowed_origins: Option<String>,
    /// Maximum requests per second per IP address
    pub rate_limit_requests_per_second: u32,
    /// Maximum burst size for rate limiting
    pub rate_limit_burst_size: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            tls: None,
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            backend_token: None,
            backend_timeout_seconds: 10,
            demo_mode: false,
            window_policy: WindowPolicy::default(),
            fetch_limit: DEFAULT_FETCH_LIMIT,
            default_display_limit: DisplayLimit::default(),
            canvas_size: DEFAULT_CANVAS_SIZE,
            radial_policy: RadialPolicy::default(),
            stale_on_error: true,
            cache_ttl_seconds: 300,
            cache_capacity: 1_000,
            cors_allowed_origins: None,
            rate_limit_requests_per_second: 60,
            rate_limit_burst_size: 10,
        }
    }
}

/// Zeroize the backend token when the configuration is dropped.
impl Drop for ServerConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        if let Some(ref mut token) = self.backend_token {
            token.zeroize();
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables only
    ///
    /// Priority order (highest to lowest):
    /// 1. Environment variables
    /// 2. .env file values (loaded by `main` before this runs)
    /// 3. Default values
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let config = merge::merge_config(None)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a YAML file with environment variable base
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables (actual ENV vars override .env values)
    /// 3. .env file values
    /// 4. Default values
    ///
    /// After loading and merging, performs validation on the final configuration.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The YAML file cannot be read or is malformed
    /// - Environment variables have invalid formats
    /// - Configuration validation fails
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let yaml_config = yaml::YamlConfig::from_file(path)?;

        // Merge environment variables (base) with YAML overrides
        let config = merge::merge_config(Some(yaml_config))?;

        validation::validate(&config)?;

        Ok(config)
    }

    /// Get the server address as a string
    ///
    /// Returns the address in the format "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if TLS is enabled
    pub fn is_tls_enabled(&self) -> bool {
        self.tls.is_some()
    }

    /// Wheel render options derived from the configuration
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::new(self.canvas_size, self.radial_policy)
    }
}
