//! Client configuration.
//!
//! Defaults target the OST KIT playground; every value can be overridden
//! from the environment.

use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_API_ENDPOINT: &str = "https://playgroundapi.ost.com/";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

pub const API_ENDPOINT_ENV: &str = "OSTKIT_API_ENDPOINT";
pub const POLL_INTERVAL_ENV: &str = "OSTKIT_POLL_INTERVAL_MS";
pub const TIMEOUT_ENV: &str = "OSTKIT_TIMEOUT_MS";

/// Configuration for OstClient
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every endpoint path is joined onto
    pub base_url: String,
    /// How often monitored transactions are polled
    pub poll_interval: Duration,
    /// Per-request HTTP timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_ENDPOINT.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(base_url) = lookup(API_ENDPOINT_ENV).filter(|s| !s.trim().is_empty()) {
            config.base_url = base_url.trim().to_string();
        }
        if let Some(ms) = lookup(POLL_INTERVAL_ENV) {
            let ms = parse_millis(POLL_INTERVAL_ENV, &ms)?;
            if ms == 0 {
                return Err(Error::Configuration(format!(
                    "{} must be greater than zero",
                    POLL_INTERVAL_ENV
                )));
            }
            config.poll_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = lookup(TIMEOUT_ENV) {
            config.timeout = Some(Duration::from_millis(parse_millis(TIMEOUT_ENV, &ms)?));
        }

        Ok(config)
    }
}

fn parse_millis(name: &str, value: &str) -> Result<u64> {
    value.trim().parse().map_err(|_| {
        Error::Configuration(format!(
            "{} must be a whole number of milliseconds, got `{}`",
            name, value
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.base_url, DEFAULT_API_ENDPOINT);
        assert_eq!(config.poll_interval, Duration::from_secs(1));
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (API_ENDPOINT_ENV, "http://www.demo.com"),
            (POLL_INTERVAL_ENV, "250"),
            (TIMEOUT_ENV, "5000"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://www.demo.com");
        assert_eq!(config.poll_interval, Duration::from_millis(250));
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_invalid_numbers() {
        let err = ClientConfig::from_lookup(lookup_from(&[(POLL_INTERVAL_ENV, "soon")]))
            .unwrap_err();
        assert!(err.is_configuration());

        let err =
            ClientConfig::from_lookup(lookup_from(&[(POLL_INTERVAL_ENV, "0")])).unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
    }
}
