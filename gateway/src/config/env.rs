//! Environment variable layer.
//!
//! `.env` values are already in the process environment by the time this
//! runs (`dotenvy` in `main`), so real variables win over `.env` ones.

use super::ConfigError;
use super::utils::{env_bool, env_parse, env_string};

/// Values read from the environment. `None` means "not set".
#[derive(Debug, Default)]
pub(crate) struct EnvConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub tls_cert_path: Option<String>,
    pub tls_key_path: Option<String>,

    pub backend_url: Option<String>,
    pub backend_token: Option<String>,
    pub backend_timeout_seconds: Option<u64>,
    pub demo_mode: Option<bool>,

    pub window_policy: Option<String>,
    pub fetch_limit: Option<u32>,
    pub default_display_limit: Option<u32>,

    pub canvas_size: Option<f64>,
    pub radial_policy: Option<String>,

    pub stale_on_error: Option<bool>,
    pub cache_ttl_seconds: Option<u64>,
    pub cache_capacity: Option<u64>,

    pub cors_allowed_origins: Option<String>,
    pub rate_limit_requests_per_second: Option<u32>,
    pub rate_limit_burst_size: Option<u32>,
}

impl EnvConfig {
    pub(crate) fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env_string("HOST"),
            port: env_parse("PORT")?,
            tls_cert_path: env_string("TLS_CERT_PATH"),
            tls_key_path: env_string("TLS_KEY_PATH"),

            backend_url: env_string("BACKEND_URL"),
            backend_token: env_string("BACKEND_TOKEN"),
            backend_timeout_seconds: env_parse("BACKEND_TIMEOUT_SECONDS")?,
            demo_mode: env_bool("DEMO_MODE")?,

            window_policy: env_string("WINDOW_POLICY"),
            fetch_limit: env_parse("FETCH_LIMIT")?,
            default_display_limit: env_parse("DEFAULT_DISPLAY_LIMIT")?,

            canvas_size: env_parse("CANVAS_SIZE")?,
            radial_policy: env_string("RADIAL_POLICY"),

            stale_on_error: env_bool("STALE_ON_ERROR")?,
            cache_ttl_seconds: env_parse("CACHE_TTL_SECONDS")?,
            cache_capacity: env_parse("CACHE_CAPACITY")?,

            cors_allowed_origins: env_string("CORS_ALLOWED_ORIGINS"),
            rate_limit_requests_per_second: env_parse("RATE_LIMIT_REQUESTS_PER_SECOND")?,
            rate_limit_burst_size: env_parse("RATE_LIMIT_BURST_SIZE")?,
        })
    }
}
