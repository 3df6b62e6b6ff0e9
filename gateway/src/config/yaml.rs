use serde::Deserialize;
use std::path::PathBuf;

/// Complete YAML configuration structure
///
/// All fields are optional to allow partial configuration. Values present
/// here override environment variables.
///
/// # Example YAML structure
/// ```yaml
/// server:
///   host: "0.0.0.0"
///   port: 3001
///   tls:
///     cert_path: "/etc/empath/cert.pem"
///     key_path: "/etc/empath/key.pem"
///
/// backend:
///   url: "http://localhost:8000/api/v1"
///   token: "service-token"
///   timeout_seconds: 10
///   demo_mode: false
///
/// selection:
///   window_policy: "causal"
///   fetch_limit: 50
///   default_display_limit: 10
///
/// wheel:
///   canvas_size: 300
///   radial_policy: "intensity_band"
///
/// feed:
///   stale_on_error: true
///   cache_ttl_seconds: 300
///   cache_capacity: 1000
///
/// security:
///   cors_allowed_origins: "https://clinic.example.com"
///   rate_limit_requests_per_second: 60
///   rate_limit_burst_size: 10
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: Option<ServerYaml>,
    pub backend: Option<BackendYaml>,
    pub selection: Option<SelectionYaml>,
    pub wheel: Option<WheelYaml>,
    pub feed: Option<FeedYaml>,
    pub security: Option<SecurityYaml>,
}

/// Server configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerYaml {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub tls: Option<TlsYaml>,
}

/// TLS configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TlsYaml {
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

/// Conversation backend from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct BackendYaml {
    /// Base URL; sessions are read from `{url}/sessions`
    pub url: Option<String>,
    /// Bearer token sent with every backend request
    pub token: Option<String>,
    pub timeout_seconds: Option<u64>,
    /// Serve synthetic placeholder sessions instead of calling the backend
    pub demo_mode: Option<bool>,
}

/// Session selection from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SelectionYaml {
    /// `causal` or `nearest`
    pub window_policy: Option<String>,
    /// Rows requested from the backend (1..=500)
    pub fetch_limit: Option<u32>,
    /// Display limit used when the URL has none (10, 25 or 50)
    pub default_display_limit: Option<u32>,
}

/// Wheel rendering from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct WheelYaml {
    pub canvas_size: Option<f64>,
    /// `intensity_band` or `score`
    pub radial_policy: Option<String>,
}

/// Session feed cache from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FeedYaml {
    /// Serve the last good result when the backend fails
    pub stale_on_error: Option<bool>,
    pub cache_ttl_seconds: Option<u64>,
    pub cache_capacity: Option<u64>,
}

/// Security configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SecurityYaml {
    /// CORS allowed origins (comma-separated list or "*" for all)
    pub cors_allowed_origins: Option<String>,
    /// Maximum requests per second per IP address
    pub rate_limit_requests_per_second: Option<u32>,
    /// Maximum burst size for rate limiting
    pub rate_limit_burst_size: Option<u32>,
}

impl YamlConfig {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file cannot be read
    /// - The YAML is malformed
    /// - Required fields have invalid types
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;

        let config: YamlConfig = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse YAML config: {e}"))?;

        Ok(config)
    }
}
