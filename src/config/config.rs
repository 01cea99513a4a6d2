use config::{Config, ConfigError, File};
use serde::Deserialize;

/// PostgreSQL connection configuration for the external order store.
///
/// The order store is owned by the swap backend and is read-only to this
/// service; only connection settings live here.
#[derive(Debug, Deserialize, Clone)]
pub struct PostgresSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
}

fn default_pool_size() -> usize {
    16
}

/// Asset-metadata service configuration.
///
/// The service returns the configured assets per chain (symbol, name,
/// token address, decimals). Responses may be stale or incomplete, so the
/// parsed catalog is cached with a TTL rather than fetched per lookup.
#[derive(Debug, Deserialize, Clone)]
pub struct MetadataSettings {
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_cache_ttl_secs() -> u64 {
    300
}

/// One external swap-aggregator API used for fee/time comparison.
#[derive(Debug, Deserialize, Clone)]
pub struct ComparatorSource {
    pub name: String,
    pub base_url: String,
}

/// Fee/time comparison configuration.
///
/// An empty source list disables the comparison entirely; a failing
/// source is skipped at query time.
#[derive(Debug, Deserialize, Clone)]
pub struct ComparatorSettings {
    #[serde(default)]
    pub sources: Vec<ComparatorSource>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ComparatorSettings {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Outbound publisher configuration.
///
/// When disabled, formatted posts are logged instead of sent.
#[derive(Debug, Deserialize, Clone)]
pub struct PublisherSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// On-disk state location.
///
/// Holds processed order ids, the post log, and the last metrics snapshot
/// (best-effort fallback cache, never authoritative).
#[derive(Debug, Deserialize, Clone)]
pub struct StateSettings {
    #[serde(default = "default_state_dir")]
    pub dir: String,
}

fn default_state_dir() -> String {
    "state".to_string()
}

impl Default for StateSettings {
    fn default() -> Self {
        Self {
            dir: default_state_dir(),
        }
    }
}

/// Root application configuration.
///
/// Loaded from `config.yaml` at startup.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub postgres: PostgresSettings,
    pub metadata: MetadataSettings,
    #[serde(default)]
    pub comparator: ComparatorSettings,
    pub publisher: PublisherSettings,
    #[serde(default)]
    pub state: StateSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name("config"))
            .build()?;

        let settings: Settings = s.try_deserialize()?;

        Ok(settings)
    }
}
