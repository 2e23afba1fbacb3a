//! Environment-driven client configuration.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Resolved configuration for the portal client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    /// Base address of the account/auth service, without a trailing slash.
    pub api_url: String,
    /// SQLite file holding the persisted session slot.
    pub session_db_path: PathBuf,
    /// Transport-level timeout; `None` leaves requests unbounded.
    pub request_timeout: Option<Duration>,
}

impl PortalConfig {
    /// Resolve from `WEWORK_API_URL`, `WEWORK_SESSION_DB` and
    /// `WEWORK_HTTP_TIMEOUT_SECS`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`PortalConfig::from_env`] but with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("WEWORK_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let session_db_path = match lookup("WEWORK_SESSION_DB").filter(|v| !v.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => default_session_db_path()?,
        };

        let request_timeout = lookup("WEWORK_HTTP_TIMEOUT_SECS")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .with_context(|| format!("WEWORK_HTTP_TIMEOUT_SECS must be whole seconds, got {raw:?}"))
            })
            .transpose()?;

        Ok(Self {
            api_url: normalize_base_url(&api_url),
            session_db_path,
            request_timeout,
        })
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

/// Resolve the default session database path:
/// `{app_data_dir}/wework/session.db`.
pub fn default_session_db_path() -> anyhow::Result<PathBuf> {
    let mut dir = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context("failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share")?;

    dir.push("wework");
    dir.push("session.db");
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn explicit_values_win() {
        let cfg = PortalConfig::from_lookup(lookup(&[
            ("WEWORK_API_URL", "https://portal.example.com/"),
            ("WEWORK_SESSION_DB", "/tmp/wework-test.db"),
            ("WEWORK_HTTP_TIMEOUT_SECS", "15"),
        ]))
        .unwrap();

        assert_eq!(cfg.api_url, "https://portal.example.com");
        assert_eq!(cfg.session_db_path, PathBuf::from("/tmp/wework-test.db"));
        assert_eq!(cfg.request_timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn api_url_defaults_to_local_dev_address() {
        let cfg = PortalConfig::from_lookup(lookup(&[("WEWORK_SESSION_DB", "/tmp/x.db")])).unwrap();
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.request_timeout, None);
    }

    #[test]
    fn bad_timeout_is_an_error() {
        let err = PortalConfig::from_lookup(lookup(&[
            ("WEWORK_SESSION_DB", "/tmp/x.db"),
            ("WEWORK_HTTP_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("WEWORK_HTTP_TIMEOUT_SECS"));
    }
}
