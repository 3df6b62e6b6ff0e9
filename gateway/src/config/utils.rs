use std::env;
use std::str::FromStr;

use super::ConfigError;

/// Parses common boolean spellings (`true/false`, `1/0`, `yes/no`, `on/off`).
pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Reads an environment variable, treating empty values as unset.
pub(crate) fn env_string(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Reads and parses an environment variable.
pub(crate) fn env_parse<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env_string(name) {
        Some(raw) => raw.parse::<T>().map(Some).map_err(|_| ConfigError::Invalid {
            field: name,
            reason: format!("cannot parse '{raw}'"),
        }),
        None => Ok(None),
    }
}

/// Reads a boolean environment variable.
pub(crate) fn env_bool(name: &'static str) -> Result<Option<bool>, ConfigError> {
    match env_string(name) {
        Some(raw) => parse_bool(&raw).map(Some).ok_or_else(|| ConfigError::Invalid {
            field: name,
            reason: format!("expected a boolean, got '{raw}'"),
        }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool(" YES "), Some(true));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
