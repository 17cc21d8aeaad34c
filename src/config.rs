//! Gateway Configuration
//!
//! Connection settings for the hosted store, read from the environment
//! at construction time. The resulting client is passed explicitly into
//! controllers; there is no module-level singleton.

use std::env;

use crate::domain::{DomainError, DomainResult};

pub const ENV_STORE_URL: &str = "BOXSORT_STORE_URL";
pub const ENV_STORE_KEY: &str = "BOXSORT_STORE_KEY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub url: String,
    pub api_key: String,
}

impl StoreConfig {
    pub fn new(url: &str, api_key: &str) -> Self {
        Self {
            url: url.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Read both settings from the environment
    pub fn from_env() -> DomainResult<Self> {
        let url = require(ENV_STORE_URL)?;
        let api_key = require(ENV_STORE_KEY)?;
        Ok(Self { url, api_key })
    }
}

fn require(key: &str) -> DomainResult<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(DomainError::Invalid(format!(
            "missing store environment variable: please ensure {} is set",
            key
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_requires_both_settings() {
        env::remove_var(ENV_STORE_URL);
        env::remove_var(ENV_STORE_KEY);
        let err = StoreConfig::from_env().unwrap_err();
        assert!(err.to_string().contains(ENV_STORE_URL));

        env::set_var(ENV_STORE_URL, "https://store.example");
        env::set_var(ENV_STORE_KEY, "anon-key");
        let config = StoreConfig::from_env().unwrap();
        assert_eq!(config, StoreConfig::new("https://store.example", "anon-key"));

        env::set_var(ENV_STORE_KEY, "   ");
        assert!(StoreConfig::from_env().is_err());

        env::remove_var(ENV_STORE_URL);
        env::remove_var(ENV_STORE_KEY);
    }
}
