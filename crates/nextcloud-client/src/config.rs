// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-client · config
// ──────────────────────────────────────────────────────────────────────────────
// Connection settings: server URL, credentials, timeouts and retry budget.
// Loadable from serde sources or from `NEXTCLOUD_*` environment variables.
// ──────────────────────────────────────────────────────────────────────────────

use crate::error::{NcResult, NextcloudError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const ENV_URL: &str = "NEXTCLOUD_URL";
pub const ENV_USER: &str = "NEXTCLOUD_USER";
pub const ENV_PASSWORD: &str = "NEXTCLOUD_PASSWORD";
pub const ENV_TIMEOUT: &str = "NEXTCLOUD_TIMEOUT";
pub const ENV_MAX_RETRIES: &str = "NEXTCLOUD_MAX_RETRIES";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RETRIES: u32 = 3;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_user_agent() -> String {
    format!("nextcloud-client/{}", env!("CARGO_PKG_VERSION"))
}

/// Settings for one Nextcloud account.
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the instance, e.g. `https://cloud.example.com`.
    pub url: String,
    pub user: String,
    /// Login or app password.
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Extra attempts for rate-limited or unavailable replies.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl ClientConfig {
    pub fn new(url: &str, user: &str, password: &str) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            user: user.to_string(),
            password: password.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            user_agent: default_user_agent(),
            accept_invalid_certs: false,
        }
    }

    /// Build from `NEXTCLOUD_URL`, `NEXTCLOUD_USER`, `NEXTCLOUD_PASSWORD`
    /// and the optional `NEXTCLOUD_TIMEOUT` / `NEXTCLOUD_MAX_RETRIES`.
    pub fn from_env() -> NcResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> NcResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| NextcloudError::Config(format!("{key} is not set")))
        };

        let mut config = Self::new(
            &required(ENV_URL)?,
            &required(ENV_USER)?,
            &lookup(ENV_PASSWORD).unwrap_or_default(),
        );

        if let Some(raw) = lookup(ENV_TIMEOUT) {
            config.timeout_secs = raw
                .parse()
                .map_err(|_| NextcloudError::Config(format!("{ENV_TIMEOUT}: not a number: {raw}")))?;
        }
        if let Some(raw) = lookup(ENV_MAX_RETRIES) {
            config.max_retries = raw.parse().map_err(|_| {
                NextcloudError::Config(format!("{ENV_MAX_RETRIES}: not a number: {raw}"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> NcResult<()> {
        let parsed = url::Url::parse(&self.url)
            .map_err(|e| NextcloudError::Config(format!("invalid url {}: {e}", self.url)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(NextcloudError::Config(format!(
                "unsupported url scheme: {}",
                parsed.scheme()
            )));
        }
        if self.user.is_empty() {
            return Err(NextcloudError::Config("user must not be empty".into()));
        }
        if self.timeout_secs == 0 {
            return Err(NextcloudError::Config("timeout_secs must be positive".into()));
        }
        Ok(())
    }

    /// The server URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn masked_password(&self) -> String {
        match self.password.char_indices().nth(4) {
            Some((cut, _)) => format!("{}****", &self.password[..cut]),
            None => "****".to_string(),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &self.masked_password())
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("user_agent", &self.user_agent)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn new_trims_trailing_slash() {
        let cfg = ClientConfig::new("https://cloud.example.com/", "alice", "pw");
        assert_eq!(cfg.base_url(), "https://cloud.example.com");
        assert_eq!(cfg.timeout_secs, 30);
        assert_eq!(cfg.max_retries, 3);
        assert!(cfg.user_agent.starts_with("nextcloud-client/"));
    }

    #[test]
    fn deserialize_applies_defaults() {
        let cfg: ClientConfig =
            serde_json::from_str(r#"{"url":"https://c.example.com","user":"bob"}"#).unwrap();
        assert_eq!(cfg.password, "");
        assert_eq!(cfg.timeout(), Duration::from_secs(30));
        assert!(!cfg.accept_invalid_certs);
        cfg.validate().unwrap();
    }

    #[test]
    fn from_lookup_reads_all_variables() {
        let cfg = ClientConfig::from_lookup(lookup(&[
            (ENV_URL, "https://cloud.example.com"),
            (ENV_USER, "alice"),
            (ENV_PASSWORD, "secret"),
            (ENV_TIMEOUT, "5"),
            (ENV_MAX_RETRIES, "0"),
        ]))
        .unwrap();
        assert_eq!(cfg.user, "alice");
        assert_eq!(cfg.password, "secret");
        assert_eq!(cfg.timeout_secs, 5);
        assert_eq!(cfg.max_retries, 0);
    }

    #[test]
    fn from_lookup_requires_url_and_user() {
        let err = ClientConfig::from_lookup(lookup(&[(ENV_USER, "alice")])).unwrap_err();
        assert!(err.to_string().contains(ENV_URL));
        let err =
            ClientConfig::from_lookup(lookup(&[(ENV_URL, "https://c.example.com")])).unwrap_err();
        assert!(err.to_string().contains(ENV_USER));
    }

    #[test]
    fn from_lookup_rejects_bad_numbers() {
        let err = ClientConfig::from_lookup(lookup(&[
            (ENV_URL, "https://c.example.com"),
            (ENV_USER, "alice"),
            (ENV_TIMEOUT, "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, NextcloudError::Config(_)));
    }

    #[test]
    fn validate_rejects_non_http_urls() {
        assert!(ClientConfig::new("ftp://c.example.com", "a", "").validate().is_err());
        assert!(ClientConfig::new("not a url", "a", "").validate().is_err());
        assert!(ClientConfig::new("http://localhost:8080", "", "").validate().is_err());
        assert!(ClientConfig::new("http://localhost:8080", "a", "").validate().is_ok());
    }

    #[test]
    fn masked_password_short() {
        let cfg = ClientConfig::new("https://c.example.com", "a", "abc");
        assert_eq!(cfg.masked_password(), "****");
    }

    #[test]
    fn masked_password_long() {
        let cfg = ClientConfig::new("https://c.example.com", "a", "abcdefgh");
        assert_eq!(cfg.masked_password(), "abcd****");
    }

    #[test]
    fn debug_never_prints_password() {
        let cfg = ClientConfig::new("https://c.example.com", "a", "hunter2-secret");
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("hunter2-secret"));
        assert!(dbg.contains("hunt****"));
    }
}
