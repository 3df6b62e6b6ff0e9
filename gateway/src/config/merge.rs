use std::path::PathBuf;

use super::env::EnvConfig;
use super::yaml::YamlConfig;
use super::{ConfigError, ServerConfig, TlsConfig};
use crate::core::selector::WindowPolicy;
use crate::core::session::clamp_fetch_limit;
use crate::core::view_state::DisplayLimit;
use crate::core::wheel::RadialPolicy;

/// Builds the final configuration: defaults, then environment, then YAML.
pub(crate) fn merge_config(yaml: Option<YamlConfig>) -> Result<ServerConfig, ConfigError> {
    let env = EnvConfig::load()?;
    let yaml = yaml.unwrap_or_default();
    let mut config = ServerConfig::default();

    let server = yaml.server.unwrap_or_default();
    let backend = yaml.backend.unwrap_or_default();
    let selection = yaml.selection.unwrap_or_default();
    let wheel = yaml.wheel.unwrap_or_default();
    let feed = yaml.feed.unwrap_or_default();
    let security = yaml.security.unwrap_or_default();

    // Server
    if let Some(host) = server.host.or(env.host) {
        config.host = host;
    }
    if let Some(port) = server.port.or(env.port) {
        config.port = port;
    }
    let tls = server.tls.unwrap_or_default();
    config.tls = match (
        tls.cert_path.or(env.tls_cert_path),
        tls.key_path.or(env.tls_key_path),
    ) {
        (Some(cert), Some(key)) => Some(TlsConfig {
            cert_path: PathBuf::from(cert),
            key_path: PathBuf::from(key),
        }),
        (None, None) => None,
        _ => {
            return Err(ConfigError::Invalid {
                field: "tls",
                reason: "both cert_path and key_path must be set".to_string(),
            });
        }
    };

    // Backend
    if let Some(url) = backend.url.or(env.backend_url) {
        config.backend_url = url;
    }
    config.backend_token = backend
        .token
        .or(env.backend_token)
        .filter(|t| !t.trim().is_empty());
    if let Some(timeout) = backend.timeout_seconds.or(env.backend_timeout_seconds) {
        config.backend_timeout_seconds = timeout;
    }
    if let Some(demo) = backend.demo_mode.or(env.demo_mode) {
        config.demo_mode = demo;
    }

    // Selection
    if let Some(raw) = selection.window_policy.or(env.window_policy) {
        config.window_policy =
            WindowPolicy::from_str(&raw).ok_or_else(|| ConfigError::Invalid {
                field: "window_policy",
                reason: format!("unknown policy '{raw}' (expected causal or nearest)"),
            })?;
    }
    if let Some(limit) = selection.fetch_limit.or(env.fetch_limit) {
        if limit != clamp_fetch_limit(limit) as u32 {
            return Err(ConfigError::Invalid {
                field: "fetch_limit",
                reason: format!("{limit} is outside 1..=500"),
            });
        }
        config.fetch_limit = limit as u16;
    }
    if let Some(limit) = selection
        .default_display_limit
        .or(env.default_display_limit)
    {
        config.default_display_limit =
            DisplayLimit::try_from(limit).map_err(|reason| ConfigError::Invalid {
                field: "default_display_limit",
                reason,
            })?;
    }

    // Wheel
    if let Some(size) = wheel.canvas_size.or(env.canvas_size) {
        config.canvas_size = size;
    }
    if let Some(raw) = wheel.radial_policy.or(env.radial_policy) {
        config.radial_policy =
            RadialPolicy::from_str(&raw).ok_or_else(|| ConfigError::Invalid {
                field: "radial_policy",
                reason: format!("unknown policy '{raw}' (expected intensity_band or score)"),
            })?;
    }

    // Feed
    if let Some(stale) = feed.stale_on_error.or(env.stale_on_error) {
        config.stale_on_error = stale;
    }
    if let Some(ttl) = feed.cache_ttl_seconds.or(env.cache_ttl_seconds) {
        config.cache_ttl_seconds = ttl;
    }
    if let Some(capacity) = feed.cache_capacity.or(env.cache_capacity) {
        config.cache_capacity = capacity;
    }

    // Security
    config.cors_allowed_origins = security
        .cors_allowed_origins
        .or(env.cors_allowed_origins);
    if let Some(rps) = security
        .rate_limit_requests_per_second
        .or(env.rate_limit_requests_per_second)
    {
        config.rate_limit_requests_per_second = rps;
    }
    if let Some(burst) = security.rate_limit_burst_size.or(env.rate_limit_burst_size) {
        config.rate_limit_burst_size = burst;
    }

    Ok(config)
}
