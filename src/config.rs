//! # Configuration
//!
//! Process-wide settings for a load-test run: where the API lives and which
//! credentials the scenarios use. Values are resolved once at startup from
//! built-in defaults and environment overrides, then shared read-only.
//!
//! ## Environment Variables
//!
//! | Variable | Default |
//! |---|---|
//! | `CONDUIT_BASE_URL` | `http://localhost:8080/api` |
//! | `CONDUIT_TEST_EMAIL` | `perf-test@example.com` |
//! | `CONDUIT_TEST_PASSWORD` | `PerfTest123!` |
//! | `CONDUIT_TEST_USERNAME` | `perftest` |
//! | `CONDUIT_SETUP_EMAIL` | `test@example.com` |
//! | `CONDUIT_SETUP_PASSWORD` | `password` |
//! | `CONDUIT_REQUEST_TIMEOUT_SECS` | `30` |
//!
//! ## Usage
//!
//! ```rust
//! use conduit_loadtest::config::LoadTestConfig;
//!
//! let config = LoadTestConfig::default();
//! assert_eq!(config.url("/tags"), "http://localhost:8080/api/tags");
//! ```

use std::env;
use std::time::Duration;

use url::Url;

use crate::error::LoadTestError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Thresholds shared by the load and smoke scenarios: 95% of requests under
/// 500ms and fewer than 1% failed requests.
pub const DEFAULT_THRESHOLDS: &[(&str, &[&str])] = &[
    ("http_req_duration", &["p(95)<500"]),
    ("http_req_failed", &["rate<0.01"]),
];
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Credentials of the user registered/logged in by the helpers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestUser {
    pub email: String,
    pub password: String,
    pub username: String,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            email: "perf-test@example.com".to_string(),
            password: "PerfTest123!".to_string(),
            username: "perftest".to_string(),
        }
    }
}

/// Login pair used by the one-time setup hook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            email: "test@example.com".to_string(),
            password: "password".to_string(),
        }
    }
}

/// Immutable run configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTestConfig {
    /// API root including the `/api` prefix, without a trailing slash
    pub base_url: String,
    pub test_user: TestUser,
    pub setup_user: Credentials,
    /// Per-request timeout for the setup/teardown client
    pub request_timeout: Duration,
}

impl Default for LoadTestConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            test_user: TestUser::default(),
            setup_user: Credentials::default(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl LoadTestConfig {
    /// Load configuration from environment variables, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`LoadTestError::InvalidConfig`] when the base URL is not an
    /// absolute http(s) URL or the timeout is not a whole number of seconds.
    pub fn from_env() -> Result<Self, LoadTestError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LoadTestError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let base_url = normalize_base_url(
            &lookup("CONDUIT_BASE_URL").unwrap_or(defaults.base_url),
        )?;

        let request_timeout = match lookup("CONDUIT_REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| LoadTestError::InvalidConfig {
                    setting: "CONDUIT_REQUEST_TIMEOUT_SECS".to_string(),
                    reason: format!("'{raw}' is not a number of seconds"),
                })?;
                Duration::from_secs(secs)
            }
            None => defaults.request_timeout,
        };

        Ok(Self {
            base_url,
            test_user: TestUser {
                email: lookup("CONDUIT_TEST_EMAIL").unwrap_or(defaults.test_user.email),
                password: lookup("CONDUIT_TEST_PASSWORD").unwrap_or(defaults.test_user.password),
                username: lookup("CONDUIT_TEST_USERNAME").unwrap_or(defaults.test_user.username),
            },
            setup_user: Credentials {
                email: lookup("CONDUIT_SETUP_EMAIL").unwrap_or(defaults.setup_user.email),
                password: lookup("CONDUIT_SETUP_PASSWORD")
                    .unwrap_or(defaults.setup_user.password),
            },
            request_timeout,
        })
    }

    /// Replace the base URL after validating it.
    ///
    /// # Errors
    ///
    /// Returns [`LoadTestError::InvalidConfig`] for relative or non-http URLs.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, LoadTestError> {
        self.base_url = normalize_base_url(base_url)?;
        Ok(self)
    }

    /// Absolute URL for an API path such as `/articles`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn normalize_base_url(base_url: &str) -> Result<String, LoadTestError> {
    let invalid = |reason: String| LoadTestError::InvalidConfig {
        setting: "base URL".to_string(),
        reason,
    };
    let parsed = Url::parse(base_url).map_err(|e| invalid(format!("'{base_url}': {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!(
            "'{base_url}' must use http or https, not {}",
            parsed.scheme()
        )));
    }
    if parsed.host_str().is_none() {
        return Err(invalid(format!("'{base_url}' has no host")));
    }
    Ok(base_url.trim_end_matches('/').to_string())
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
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = LoadTestConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, LoadTestConfig::default());
        assert_eq!(config.test_user.email, "perf-test@example.com");
        assert_eq!(config.setup_user.password, "password");
    }

    #[test]
    fn test_environment_overrides() {
        let config = LoadTestConfig::from_lookup(lookup_from(&[
            ("CONDUIT_BASE_URL", "https://conduit.test/api/"),
            ("CONDUIT_TEST_USERNAME", "someone"),
            ("CONDUIT_REQUEST_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "https://conduit.test/api");
        assert_eq!(config.test_user.username, "someone");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.url("/user"), "https://conduit.test/api/user");
    }

    #[test]
    fn test_rejects_relative_base_url() {
        let err = LoadTestConfig::from_lookup(lookup_from(&[("CONDUIT_BASE_URL", "/api")]))
            .unwrap_err();
        assert!(matches!(err, LoadTestError::InvalidConfig { .. }));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let err = LoadTestConfig::default()
            .with_base_url("ftp://example.com/api")
            .unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn test_rejects_bad_timeout() {
        let err = LoadTestConfig::from_lookup(lookup_from(&[(
            "CONDUIT_REQUEST_TIMEOUT_SECS",
            "soon",
        )]))
        .unwrap_err();
        assert!(err.to_string().contains("CONDUIT_REQUEST_TIMEOUT_SECS"));
    }
}
