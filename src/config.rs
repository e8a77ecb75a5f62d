//! Runtime configuration
//!
//! Settings come from environment variables and can be overridden by
//! command-line flags.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::warn;

use crate::api::{ApiClient, DEFAULT_BASE_URL};
use crate::checkout::CheckoutConfig;
use crate::cli::Cli;
use crate::storage::{FileStore, MemoryStore, SharedStore};

/// Backend base URL
pub const ENV_API_URL: &str = "SKILLPORT_API_URL";
/// Bearer token of the logged-in user
pub const ENV_TOKEN: &str = "SKILLPORT_TOKEN";
/// Payment gateway publishable key
pub const ENV_PAYMENT_KEY: &str = "RAZORPAY_KEY";
/// Directory for cached data and logs
pub const ENV_CACHE_DIR: &str = "SKILLPORT_CACHE_DIR";

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the marketplace REST API
    pub api_base_url: String,
    /// Login token sent as a bearer token
    pub token: Option<String>,
    /// Gateway key passed to the payment widget
    pub payment_key: Option<String>,
    /// Overrides the XDG cache directory
    pub cache_dir: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from the process environment
    ///
    /// # Environment Variables
    /// - `SKILLPORT_API_URL` - Backend base URL (default: `http://localhost:4000/api/v1`)
    /// - `SKILLPORT_TOKEN` - Login token (default: none)
    /// - `RAZORPAY_KEY` - Payment gateway key (default: none)
    /// - `SKILLPORT_CACHE_DIR` - Cache directory (default: XDG cache dir)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through `lookup`; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            api_base_url: get(ENV_API_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            token: get(ENV_TOKEN),
            payment_key: get(ENV_PAYMENT_KEY),
            cache_dir: get(ENV_CACHE_DIR).map(PathBuf::from),
        }
    }

    /// Applies flags given on the command line
    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(url) = &cli.api_url {
            self.api_base_url = url.clone();
        }
        if let Some(token) = &cli.token {
            self.token = Some(token.clone());
        }
        if let Some(dir) = &cli.cache_dir {
            self.cache_dir = Some(dir.clone());
        }
        self
    }

    pub fn api_client(&self) -> ApiClient {
        ApiClient::new(self.api_base_url.clone()).with_token(self.token.clone())
    }

    pub fn checkout_config(&self) -> CheckoutConfig {
        CheckoutConfig {
            payment_key: self.payment_key.clone(),
            ..CheckoutConfig::default()
        }
    }

    /// File store for cached data, in memory if no cache directory exists
    pub fn store(&self) -> SharedStore {
        let file_store = match &self.cache_dir {
            Some(dir) => Some(FileStore::with_dir(dir.clone())),
            None => FileStore::new(),
        };
        match file_store {
            Some(store) => Arc::new(store),
            None => {
                warn!("no cache directory available, reviews will not persist");
                Arc::new(MemoryStore::new())
            }
        }
    }

    /// Directory for the TUI log file
    pub fn log_dir(&self) -> Option<PathBuf> {
        self.cache_dir.clone().or_else(|| {
            FileStore::new().map(|store| store.dir().to_path_buf())
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::KeyValueStore;
    use clap::Parser;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.api_base_url, DEFAULT_BASE_URL);
        assert!(config.token.is_none());
        assert!(config.payment_key.is_none());
        assert!(config.cache_dir.is_none());
    }

    #[test]
    fn test_config_from_lookup_reads_every_variable() {
        let config = Config::from_lookup(lookup(&[
            (ENV_API_URL, "https://api.skillport.test/v1"),
            (ENV_TOKEN, "tok"),
            (ENV_PAYMENT_KEY, "rzp_live"),
            (ENV_CACHE_DIR, "/tmp/skillport"),
        ]));

        assert_eq!(config.api_base_url, "https://api.skillport.test/v1");
        assert_eq!(config.token.as_deref(), Some("tok"));
        assert_eq!(config.payment_key.as_deref(), Some("rzp_live"));
        assert_eq!(config.cache_dir, Some(PathBuf::from("/tmp/skillport")));
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = Config::from_lookup(lookup(&[(ENV_API_URL, " "), (ENV_TOKEN, "")]));
        assert_eq!(config.api_base_url, DEFAULT_BASE_URL);
        assert!(config.token.is_none());
    }

    #[test]
    fn test_cli_flags_override_environment() {
        let config = Config::from_lookup(lookup(&[(ENV_API_URL, "http://env"), (ENV_TOKEN, "env")]));
        let cli = Cli::parse_from([
            "skillport",
            "--api-url",
            "http://flag",
            "--cache-dir",
            "/var/cache/sp",
            "reviews",
        ]);

        let config = config.with_overrides(&cli);

        assert_eq!(config.api_base_url, "http://flag");
        assert_eq!(config.token.as_deref(), Some("env"));
        assert_eq!(config.cache_dir, Some(PathBuf::from("/var/cache/sp")));
    }

    #[test]
    fn test_store_uses_configured_directory() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = Config {
            cache_dir: Some(temp_dir.path().to_path_buf()),
            ..Config::default()
        };

        config.store().set_item("probe", "1").unwrap();

        assert!(temp_dir.path().join("probe.json").exists());
        assert_eq!(config.log_dir(), Some(temp_dir.path().to_path_buf()));
    }

    #[test]
    fn test_checkout_config_carries_payment_key() {
        let config = Config {
            payment_key: Some("rzp_test".to_string()),
            ..Config::default()
        };
        assert_eq!(config.checkout_config().payment_key.as_deref(), Some("rzp_test"));
        assert_eq!(config.api_client().base_url(), DEFAULT_BASE_URL);
    }
}
