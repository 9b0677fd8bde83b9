//! Configuration handling for the lens.
//!
//! Every knob has a compiled-in default; `Config::from_env` lets an operator
//! override the handful that differ between deployments (index location,
//! API endpoint, mirror list, noise threshold, cache directory). The
//! resulting value is immutable and shared by reference with every component.

pub mod publishers;

use std::collections::HashMap;
use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub use publishers::{PublisherPattern, PublisherSelectors, default_publishers};

/// Environment variable names.
pub const ENV_JOURNAL_INDEX_URL: &str = "PAPERLENS_JOURNAL_INDEX_URL";
pub const ENV_CROSSREF_URL: &str = "PAPERLENS_CROSSREF_URL";
pub const ENV_MIN_IMPACT_FACTOR: &str = "PAPERLENS_MIN_IMPACT_FACTOR";
pub const ENV_CACHE_DIR: &str = "PAPERLENS_CACHE_DIR";
pub const ENV_MIRRORS: &str = "PAPERLENS_MIRRORS";

/// Cache keys with a dedicated TTL.
pub const CACHE_KEY_JOURNAL_INDEX: &str = "journal-index";
pub const CACHE_KEY_MIRROR_DOMAIN: &str = "mirror-domain";

/// Placeholder left in unconfigured deployments; treated as "no index".
pub const JOURNAL_INDEX_PLACEHOLDER: &str = "PASTE_YOUR_GIST_RAW_URL_HERE";

const DEFAULT_JOURNAL_INDEX_URL: &str = "https://gist.githubusercontent.com/Toutais998/492aef504e6e35eab7bdc5b95d275b53/raw/befd4711e89e06e7f281edfde380efeed7de0e39/gistfile1.txt";
const DEFAULT_CROSSREF_URL: &str = "https://api.crossref.org";
const DEFAULT_MIRRORS: [&str; 3] = ["sci-hub.se", "sci-hub.ren", "sci-hub.ru"];
const DEFAULT_MIRROR_SCHEME: &str = "https";
const DEFAULT_MIRROR_PROBE_TIMEOUT: Duration = Duration::from_secs(3);
const DEFAULT_MIN_IMPACT_FACTOR: f64 = 0.0;
const DEFAULT_USER_AGENT: &str = "paperlens/0.1 (+https://github.com/paperlens/paperlens)";

const JOURNAL_INDEX_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);
const MIRROR_DOMAIN_TTL: Duration = Duration::from_secs(6 * 60 * 60);
const FALLBACK_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Per-key cache lifetimes.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheTtls {
    by_key: HashMap<String, Duration>,
    fallback: Duration,
}

impl CacheTtls {
    pub fn new(fallback: Duration) -> Self {
        Self {
            by_key: HashMap::new(),
            fallback,
        }
    }

    pub fn with(mut self, key: impl Into<String>, ttl: Duration) -> Self {
        self.by_key.insert(key.into(), ttl);
        self
    }

    /// TTL applied to `key`; keys without an explicit entry get the fallback.
    pub fn ttl_for(&self, key: &str) -> Duration {
        self.by_key.get(key).copied().unwrap_or(self.fallback)
    }
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self::new(FALLBACK_TTL)
            .with(CACHE_KEY_JOURNAL_INDEX, JOURNAL_INDEX_TTL)
            .with(CACHE_KEY_MIRROR_DOMAIN, MIRROR_DOMAIN_TTL)
    }
}

/// Runtime configuration, built once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    journal_index_url: String,
    crossref_url: String,
    mirror_candidates: Vec<String>,
    mirror_scheme: String,
    mirror_probe_timeout: Duration,
    min_impact_factor: f64,
    cache_ttls: CacheTtls,
    cache_dir: Option<PathBuf>,
    user_agent: String,
    publishers: Vec<PublisherPattern>,
}

impl Config {
    /// Load from environment variables, falling back to compiled-in defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(url) = env::var(ENV_JOURNAL_INDEX_URL) {
            config.journal_index_url = url;
        }
        if let Ok(url) = env::var(ENV_CROSSREF_URL) {
            config.crossref_url = parse_base_url(ENV_CROSSREF_URL, &url)?;
        }
        if let Ok(raw) = env::var(ENV_MIN_IMPACT_FACTOR) {
            config.min_impact_factor = parse_threshold(&raw)?;
        }
        if let Ok(dir) = env::var(ENV_CACHE_DIR)
            && !dir.trim().is_empty()
        {
            config.cache_dir = Some(PathBuf::from(dir));
        }
        if let Ok(raw) = env::var(ENV_MIRRORS) {
            let mirrors: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .collect();
            if mirrors.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: ENV_MIRRORS,
                    reason: "expected at least one hostname".to_string(),
                });
            }
            config.mirror_candidates = mirrors;
        }

        Ok(config)
    }

    pub fn with_journal_index_url(mut self, url: impl Into<String>) -> Self {
        self.journal_index_url = url.into();
        self
    }

    pub fn with_crossref_url(mut self, url: impl Into<String>) -> Self {
        self.crossref_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Replace the mirror probe list. `scheme` is normally `https`; plain
    /// `http` is accepted so local stand-ins can be probed.
    pub fn with_mirrors<I, S>(mut self, scheme: &str, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mirror_scheme = scheme.to_string();
        self.mirror_candidates = candidates.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_mirror_probe_timeout(mut self, timeout: Duration) -> Self {
        self.mirror_probe_timeout = timeout;
        self
    }

    pub fn with_min_impact_factor(mut self, threshold: f64) -> Self {
        self.min_impact_factor = threshold;
        self
    }

    pub fn with_cache_ttls(mut self, ttls: CacheTtls) -> Self {
        self.cache_ttls = ttls;
        self
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    pub fn with_publishers(mut self, publishers: Vec<PublisherPattern>) -> Self {
        self.publishers = publishers;
        self
    }

    /// Location of the journal quality document.
    pub fn journal_index_url(&self) -> &str {
        &self.journal_index_url
    }
    /// Base URL of the citation API, without trailing slash.
    pub fn crossref_url(&self) -> &str {
        &self.crossref_url
    }
    pub fn mirror_candidates(&self) -> &[String] {
        &self.mirror_candidates
    }
    pub fn mirror_scheme(&self) -> &str {
        &self.mirror_scheme
    }
    pub fn mirror_probe_timeout(&self) -> Duration {
        self.mirror_probe_timeout
    }
    /// Journals whose impact factor falls below this are not presented.
    pub fn min_impact_factor(&self) -> f64 {
        self.min_impact_factor
    }
    pub fn cache_ttls(&self) -> &CacheTtls {
        &self.cache_ttls
    }
    /// Directory for the file-backed store; `None` keeps the cache in memory.
    pub fn cache_dir(&self) -> Option<&PathBuf> {
        self.cache_dir.as_ref()
    }
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
    pub fn publishers(&self) -> &[PublisherPattern] {
        &self.publishers
    }

    /// Publisher whose domain list covers `host` (suffix match).
    pub fn publisher_for_host(&self, host: &str) -> Option<&PublisherPattern> {
        self.publishers.iter().find(|p| p.matches_host(host))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            journal_index_url: DEFAULT_JOURNAL_INDEX_URL.to_string(),
            crossref_url: DEFAULT_CROSSREF_URL.to_string(),
            mirror_candidates: DEFAULT_MIRRORS.iter().map(|m| m.to_string()).collect(),
            mirror_scheme: DEFAULT_MIRROR_SCHEME.to_string(),
            mirror_probe_timeout: DEFAULT_MIRROR_PROBE_TIMEOUT,
            min_impact_factor: DEFAULT_MIN_IMPACT_FACTOR,
            cache_ttls: CacheTtls::default(),
            cache_dir: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            publishers: default_publishers(),
        }
    }
}

fn parse_base_url(field: &'static str, raw: &str) -> Result<String, ConfigError> {
    let parsed = url::Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidValue {
        field,
        reason: e.to_string(),
    })?;
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

fn parse_threshold(raw: &str) -> Result<f64, ConfigError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            field: ENV_MIN_IMPACT_FACTOR,
            reason: format!("'{raw}' is not a number"),
        })?;
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidValue {
            field: ENV_MIN_IMPACT_FACTOR,
            reason: "must be a non-negative number".to_string(),
        });
    }
    Ok(value)
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}
