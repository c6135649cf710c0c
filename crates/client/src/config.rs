//! Client configuration.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const API_URL_VAR: &str = "CLUBDESK_API_URL";
const CREDENTIALS_VAR: &str = "CLUBDESK_CREDENTIALS";
const TIMEOUT_VAR: &str = "CLUBDESK_TIMEOUT_SECS";

/// Where the API lives and where the credential is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the REST API, without trailing slash.
    pub api_url: String,

    /// Override for the credential file; `None` uses the platform config directory.
    pub credentials_path: Option<PathBuf>,

    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: normalize_url(api_url.into()),
            credentials_path: None,
            request_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Read `CLUBDESK_API_URL`, `CLUBDESK_CREDENTIALS` and `CLUBDESK_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::new(
            lookup(API_URL_VAR)
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        );

        if let Some(path) = lookup(CREDENTIALS_VAR).filter(|p| !p.trim().is_empty()) {
            config.credentials_path = Some(PathBuf::from(path));
        }

        if let Some(raw) = lookup(TIMEOUT_VAR) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.request_timeout = Duration::from_secs(secs),
                _ => tracing::warn!(value = %raw, "ignoring invalid {TIMEOUT_VAR}"),
            }
        }

        config
    }

    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = normalize_url(api_url.into());
        self
    }

    pub fn credentials_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = Some(path.into());
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// The credential file to use: the override, or
    /// `<config dir>/clubdesk/credentials.json`.
    pub fn resolved_credentials_path(&self) -> Option<PathBuf> {
        self.credentials_path.clone().or_else(|| {
            dirs::config_dir().map(|dir| dir.join("clubdesk").join("credentials.json"))
        })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

fn normalize_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ClientConfig::from_lookup(lookup(&[]));
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.credentials_path, None);
        assert_eq!(config.request_timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn reads_every_variable() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("CLUBDESK_API_URL", "https://club.example/api/"),
            ("CLUBDESK_CREDENTIALS", "/tmp/creds.json"),
            ("CLUBDESK_TIMEOUT_SECS", "5"),
        ]));
        assert_eq!(config.api_url, "https://club.example/api");
        assert_eq!(config.credentials_path, Some(PathBuf::from("/tmp/creds.json")));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn invalid_timeout_falls_back_to_default() {
        for raw in ["soon", "0", "-1"] {
            let config = ClientConfig::from_lookup(lookup(&[("CLUBDESK_TIMEOUT_SECS", raw)]));
            assert_eq!(config.request_timeout, DEFAULT_TIMEOUT);
        }
    }

    #[test]
    fn override_wins_over_platform_dir() {
        let config = ClientConfig::default().credentials_path("/srv/club/token.json");
        assert_eq!(
            config.resolved_credentials_path(),
            Some(PathBuf::from("/srv/club/token.json"))
        );
    }

    #[test]
    fn builder_chain() {
        let config = ClientConfig::new("http://127.0.0.1:9000/")
            .request_timeout(Duration::from_millis(250))
            .credentials_path("c.json");
        assert_eq!(config.api_url, "http://127.0.0.1:9000");
        assert_eq!(config.request_timeout, Duration::from_millis(250));
    }
}
