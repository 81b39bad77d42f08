use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

/// Days a deleted entry stays in the remote trash before the server purges it
pub const MAX_RETENTION_DAYS: i64 = 10;

/// Connection settings for the remote storage API
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL of the web API, with trailing slash
    pub api_url: String,
    /// Raw `Cookie` header value of the logged-in session
    pub cookie: String,
    /// CSRF token issued with the session
    pub bdstoken: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_url: "https://pan.baidu.com/api/".to_string(),
            cookie: String::new(),
            bdstoken: String::new(),
        }
    }
}

/// Trash listing settings
#[derive(Debug, Clone)]
pub struct TrashConfig {
    /// Remote directory whose trash is listed
    pub root_path: String,
    /// Entries requested per page
    pub page_size: u32,
    /// Retention window used for the "remaining days" column
    pub retention_days: i64,
}

impl Default for TrashConfig {
    fn default() -> Self {
        Self {
            root_path: "/".to_string(),
            page_size: 100,
            retention_days: MAX_RETENTION_DAYS,
        }
    }
}

/// Timeouts for remote operations
#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    /// Timeout for a single API request (ms)
    pub network_operation_ms: u64,
    /// Timeout for establishing the connection (ms)
    pub connect_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            network_operation_ms: 15000, // 15 seconds
            connect_ms: 5000,
        }
    }
}

impl TimeoutConfig {
    pub fn network_timeout(&self) -> Duration {
        Duration::from_millis(self.network_operation_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_ms)
    }
}

/// Global client configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub remote: RemoteConfig,
    pub trash: TrashConfig,
    pub timeouts: TimeoutConfig,
}

impl AppConfig {
    /// Builds the configuration from `CLOUD_TRASH_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` but reads values through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("CLOUD_TRASH_API_URL") {
            config.remote.api_url = if url.ends_with('/') { url } else { format!("{}/", url) };
        }
        if let Some(cookie) = lookup("CLOUD_TRASH_COOKIE") {
            config.remote.cookie = cookie;
        }
        if let Some(token) = lookup("CLOUD_TRASH_BDSTOKEN") {
            config.remote.bdstoken = token;
        }
        if let Some(root) = lookup("CLOUD_TRASH_ROOT") {
            config.trash.root_path = root;
        }

        config.trash.page_size =
            parse_or(&lookup, "CLOUD_TRASH_PAGE_SIZE", config.trash.page_size).max(1);
        config.trash.retention_days =
            parse_or(&lookup, "CLOUD_TRASH_RETENTION_DAYS", config.trash.retention_days);
        config.timeouts.network_operation_ms = parse_or(
            &lookup,
            "CLOUD_TRASH_NETWORK_TIMEOUT_MS",
            config.timeouts.network_operation_ms,
        );

        config
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Invalid value {:?} for {}, using {}", raw, key, default);
            default
        }),
        None => default,
    }
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
    fn test_defaults() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config.trash.page_size, 100);
        assert_eq!(config.trash.retention_days, MAX_RETENTION_DAYS);
        assert_eq!(config.trash.root_path, "/");
        assert_eq!(config.timeouts.network_timeout(), Duration::from_secs(15));
    }

    #[test]
    fn test_overrides_and_trailing_slash() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("CLOUD_TRASH_API_URL", "http://localhost:8080/api"),
            ("CLOUD_TRASH_COOKIE", "BDUSS=abc"),
            ("CLOUD_TRASH_BDSTOKEN", "tok"),
            ("CLOUD_TRASH_PAGE_SIZE", "20"),
        ]));

        assert_eq!(config.remote.api_url, "http://localhost:8080/api/");
        assert_eq!(config.remote.cookie, "BDUSS=abc");
        assert_eq!(config.remote.bdstoken, "tok");
        assert_eq!(config.trash.page_size, 20);
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("CLOUD_TRASH_PAGE_SIZE", "lots"),
            ("CLOUD_TRASH_NETWORK_TIMEOUT_MS", "-3"),
        ]));

        assert_eq!(config.trash.page_size, 100);
        assert_eq!(config.timeouts.network_operation_ms, 15000);
    }
}
