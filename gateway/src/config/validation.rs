use url::Url;

use super::{ConfigError, ServerConfig};
use crate::core::session::{MAX_FETCH_LIMIT, MIN_FETCH_LIMIT};
use crate::core::wheel::MIN_CANVAS_SIZE;

/// Validates the backend base URL.
///
/// Skipped in demo mode, where the backend is never contacted.
pub(crate) fn validate_backend_url(url: &str, demo_mode: bool) -> Result<(), ConfigError> {
    if demo_mode {
        return Ok(());
    }
    let parsed = Url::parse(url).map_err(|e| ConfigError::Invalid {
        field: "backend.url",
        reason: format!("'{url}' is not a valid URL: {e}"),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ConfigError::Invalid {
            field: "backend.url",
            reason: format!("scheme must be http or https, got '{scheme}'"),
        }),
    }
}

pub(crate) fn validate_canvas_size(size: f64) -> Result<(), ConfigError> {
    if size.is_finite() && size >= MIN_CANVAS_SIZE {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field: "wheel.canvas_size",
            reason: format!("{size} is below the minimum of {MIN_CANVAS_SIZE}"),
        })
    }
}

pub(crate) fn validate_fetch_limit(limit: u16) -> Result<(), ConfigError> {
    if (MIN_FETCH_LIMIT..=MAX_FETCH_LIMIT).contains(&limit) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field: "selection.fetch_limit",
            reason: format!("{limit} is outside {MIN_FETCH_LIMIT}..={MAX_FETCH_LIMIT}"),
        })
    }
}

pub(crate) fn validate_rate_limit(rps: u32, burst: u32) -> Result<(), ConfigError> {
    if rps == 0 || burst == 0 {
        return Err(ConfigError::Invalid {
            field: "security.rate_limit",
            reason: "requests per second and burst size must be positive".to_string(),
        });
    }
    Ok(())
}

/// Runs every check against a merged configuration.
pub(crate) fn validate(config: &ServerConfig) -> Result<(), ConfigError> {
    validate_backend_url(&config.backend_url, config.demo_mode)?;
    validate_canvas_size(config.canvas_size)?;
    validate_fetch_limit(config.fetch_limit)?;
    validate_rate_limit(
        config.rate_limit_requests_per_second,
        config.rate_limit_burst_size,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_url() {
        assert!(validate_backend_url("http://localhost:8000/api/v1", false).is_ok());
        assert!(validate_backend_url("https://api.example.com", false).is_ok());
        assert!(validate_backend_url("ftp://example.com", false).is_err());
        assert!(validate_backend_url("localhost:8000", false).is_err());
        assert!(validate_backend_url("", false).is_err());
        // demo mode never calls the backend
        assert!(validate_backend_url("", true).is_ok());
    }

    #[test]
    fn test_canvas_size() {
        assert!(validate_canvas_size(300.0).is_ok());
        assert!(validate_canvas_size(100.0).is_ok());
        assert!(validate_canvas_size(99.0).is_err());
        assert!(validate_canvas_size(f64::NAN).is_err());
    }

    #[test]
    fn test_fetch_limit() {
        assert!(validate_fetch_limit(1).is_ok());
        assert!(validate_fetch_limit(500).is_ok());
        assert!(validate_fetch_limit(0).is_err());
        assert!(validate_fetch_limit(501).is_err());
    }

    #[test]
    fn test_rate_limit() {
        assert!(validate_rate_limit(60, 10).is_ok());
        assert!(validate_rate_limit(0, 10).is_err());
        assert!(validate_rate_limit(60, 0).is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&ServerConfig::default()).is_ok());
    }
}
