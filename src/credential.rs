//! API credential types.
//!
//! Holds the key/secret pair used to sign OST KIT requests. The secret never
//! leaves this crate: there is no public getter and `Debug` redacts it.

use std::fmt;

use crate::error::{Error, Result};
use crate::signer;

pub const API_KEY_ENV: &str = "OSTKIT_API_KEY";
pub const API_SECRET_ENV: &str = "OSTKIT_API_SECRET";

#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
}

impl Credentials {
    /// Both values are required; an empty key or secret is rejected.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        let api_secret = api_secret.into();

        if api_key.is_empty() {
            return Err(Error::Configuration("missing parameter: api_key".into()));
        }
        if api_secret.is_empty() {
            return Err(Error::Configuration("missing parameter: api_secret".into()));
        }

        Ok(Self {
            api_key,
            api_secret,
        })
    }

    /// Read `OSTKIT_API_KEY` / `OSTKIT_API_SECRET` from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup(API_KEY_ENV)
            .ok_or_else(|| Error::Configuration(format!("{} is not set", API_KEY_ENV)))?;
        let api_secret = lookup(API_SECRET_ENV)
            .ok_or_else(|| Error::Configuration(format!("{} is not set", API_SECRET_ENV)))?;
        Self::new(api_key, api_secret)
    }

    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }

    pub(crate) fn sign(&self, message: &str) -> String {
        signer::sign(&self.api_secret, message)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_or_secret() {
        assert!(Credentials::new("", "").unwrap_err().is_configuration());
        assert!(Credentials::new("apikey", "").unwrap_err().is_configuration());
        assert!(Credentials::new("", "apisecret").unwrap_err().is_configuration());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = Credentials::new("apikey", "apisecret").unwrap();
        let printed = format!("{:?}", creds);
        assert!(printed.contains("apikey"));
        assert!(!printed.contains("apisecret"));
    }

    #[test]
    fn test_from_lookup() {
        let creds = Credentials::from_lookup(|name| match name {
            API_KEY_ENV => Some("apikey".to_string()),
            API_SECRET_ENV => Some("apisecret".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(creds.api_key(), "apikey");

        let err = Credentials::from_lookup(|name| {
            (name == API_KEY_ENV).then(|| "apikey".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains(API_SECRET_ENV));
    }
}
