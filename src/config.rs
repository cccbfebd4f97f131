use anyhow::{Context, Result};
use std::time::Duration;
use url::Url;

use crate::resolver::DEFAULT_TTL;
use crate::sources::catalog::DEFAULT_BASE_URL;

#[derive(Debug, Clone)]
pub struct Config {
    // Búsqueda remota
    pub search_base_url: Url,
    pub http_timeout: Duration,
    pub user_agent: String,

    // Caché
    pub cache_ttl: Duration,
    pub cache_cleanup_interval: Duration,

    // Rendimiento
    pub resolve_concurrency: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    /// Unset or blank variables fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let duration = |name: &str, default: Duration| -> Result<Duration> {
            match var(name) {
                Some(raw) => humantime::parse_duration(raw.trim())
                    .with_context(|| format!("{name} is not a valid duration: {raw:?}")),
                None => Ok(default),
            }
        };

        let config = Self {
            search_base_url: match var("SEARCH_BASE_URL") {
                Some(raw) => Url::parse(raw.trim())
                    .with_context(|| format!("SEARCH_BASE_URL is not a valid URL: {raw:?}"))?,
                None => defaults.search_base_url,
            },
            http_timeout: duration("HTTP_TIMEOUT", defaults.http_timeout)?,
            user_agent: var("USER_AGENT").unwrap_or(defaults.user_agent),

            cache_ttl: duration("CACHE_TTL", defaults.cache_ttl)?,
            cache_cleanup_interval: duration("CACHE_CLEANUP_INTERVAL", defaults.cache_cleanup_interval)?,

            resolve_concurrency: match var("RESOLVE_CONCURRENCY") {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .with_context(|| format!("RESOLVE_CONCURRENCY is not a number: {raw:?}"))?,
                None => defaults.resolve_concurrency,
            },
        };

        config.validate()?;

        Ok(config)
    }

    /// Validates configuration values for correctness.
    ///
    /// - The search endpoint must be an absolute `http`/`https` URL
    /// - Every duration must be non-zero
    /// - Batch concurrency must be at least 1
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.search_base_url.scheme(), "http" | "https") {
            anyhow::bail!(
                "Search endpoint must be http or https, got: {}",
                self.search_base_url
            );
        }

        if self.http_timeout.is_zero() {
            anyhow::bail!("HTTP timeout must be greater than 0");
        }

        if self.cache_ttl.is_zero() {
            anyhow::bail!("Cache TTL must be greater than 0");
        }

        if self.cache_cleanup_interval.is_zero() {
            anyhow::bail!("Cache cleanup interval must be greater than 0");
        }

        if self.resolve_concurrency == 0 {
            anyhow::bail!("Resolve concurrency must be greater than 0");
        }

        Ok(())
    }

    /// Returns a summary of the current configuration for logging.
    pub fn summary(&self) -> String {
        format!(
            "Config Summary:\n  \
            Search: {} (timeout {})\n  \
            Cache: ttl {}, cleanup every {}\n  \
            Batch: {} concurrent lookups",
            self.search_base_url,
            humantime::format_duration(self.http_timeout),
            humantime::format_duration(self.cache_ttl),
            humantime::format_duration(self.cache_cleanup_interval),
            self.resolve_concurrency,
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_base_url: Url::parse(DEFAULT_BASE_URL).expect("default search URL is valid"),
            http_timeout: Duration::from_secs(5),
            user_agent: format!("music-meta/{}", env!("CARGO_PKG_VERSION")),

            cache_ttl: DEFAULT_TTL,
            cache_cleanup_interval: Duration::from_secs(300), // 5 minutos

            resolve_concurrency: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config.search_base_url.as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.cache_ttl, Duration::from_secs(3600));
        assert_eq!(config.http_timeout, Duration::from_secs(5));
        assert_eq!(config.resolve_concurrency, 4);
        assert!(config.user_agent.starts_with("music-meta/"));
    }

    #[test]
    fn parses_overrides() {
        let config = load(&[
            ("SEARCH_BASE_URL", "http://127.0.0.1:8080/search"),
            ("CACHE_TTL", "90m"),
            ("CACHE_CLEANUP_INTERVAL", "30s"),
            ("HTTP_TIMEOUT", " 2s "),
            ("RESOLVE_CONCURRENCY", "16"),
            ("USER_AGENT", "custom"),
        ])
        .unwrap();

        assert_eq!(config.search_base_url.as_str(), "http://127.0.0.1:8080/search");
        assert_eq!(config.cache_ttl, Duration::from_secs(90 * 60));
        assert_eq!(config.cache_cleanup_interval, Duration::from_secs(30));
        assert_eq!(config.http_timeout, Duration::from_secs(2));
        assert_eq!(config.resolve_concurrency, 16);
        assert_eq!(config.user_agent, "custom");
    }

    #[test]
    fn blank_values_fall_back() {
        let config = load(&[("CACHE_TTL", "  "), ("RESOLVE_CONCURRENCY", "")]).unwrap();
        assert_eq!(config.cache_ttl, DEFAULT_TTL);
        assert_eq!(config.resolve_concurrency, 4);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(load(&[("CACHE_TTL", "forever")]).is_err());
        assert!(load(&[("CACHE_TTL", "0s")]).is_err());
        assert!(load(&[("RESOLVE_CONCURRENCY", "0")]).is_err());
        assert!(load(&[("SEARCH_BASE_URL", "ftp://example.com/search")]).is_err());
        assert!(load(&[("SEARCH_BASE_URL", "not a url")]).is_err());
    }

    #[test]
    fn summary_mentions_endpoint() {
        let summary = Config::default().summary();
        assert!(summary.contains("itunes.apple.com"));
        assert!(summary.contains("ttl 1h"));
    }
}
