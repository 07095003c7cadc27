use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "https://jsonplaceholder.typicode.com/users";
pub const DEFAULT_MAILBOX_SIZE: usize = 32;

const API_URL_KEY: &str = "USER_MANAGER_API_URL";
const MAILBOX_SIZE_KEY: &str = "USER_MANAGER_MAILBOX_SIZE";
const REQUEST_TIMEOUT_KEY: &str = "USER_MANAGER_REQUEST_TIMEOUT_SECS";

/// Runtime settings, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Collection endpoint, without a trailing slash.
    pub api_url: String,
    pub mailbox_size: usize,
    /// `None` leaves requests without a client-side timeout.
    pub request_timeout: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            mailbox_size: DEFAULT_MAILBOX_SIZE,
            request_timeout: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup; unset or blank keys keep
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(url) = get(API_URL_KEY) {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl { key: API_URL_KEY, value: url });
            }
            config.api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(size) = get(MAILBOX_SIZE_KEY) {
            config.mailbox_size = parse_positive(MAILBOX_SIZE_KEY, &size)? as usize;
        }
        if let Some(secs) = get(REQUEST_TIMEOUT_KEY) {
            config.request_timeout = Some(Duration::from_secs(parse_positive(REQUEST_TIMEOUT_KEY, &secs)?));
        }
        Ok(config)
    }
}

fn parse_positive(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    match value.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidNumber { key, value: value.to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.api_url, "https://jsonplaceholder.typicode.com/users");
        assert_eq!(config.request_timeout, None);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("USER_MANAGER_API_URL", "http://localhost:8080/users/"),
            ("USER_MANAGER_MAILBOX_SIZE", "8"),
            ("USER_MANAGER_REQUEST_TIMEOUT_SECS", "10"),
        ])
        .unwrap();
        assert_eq!(config.api_url, "http://localhost:8080/users");
        assert_eq!(config.mailbox_size, 8);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_blank_values_keep_defaults() {
        let config = load(&[("USER_MANAGER_API_URL", "  ")]).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            load(&[("USER_MANAGER_API_URL", "ftp://x")]),
            Err(ConfigError::InvalidUrl {
                key: "USER_MANAGER_API_URL",
                value: "ftp://x".to_string()
            })
        );
        assert!(matches!(
            load(&[("USER_MANAGER_MAILBOX_SIZE", "0")]),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert!(matches!(
            load(&[("USER_MANAGER_REQUEST_TIMEOUT_SECS", "soon")]),
            Err(ConfigError::InvalidNumber { .. })
        ));
    }
}
