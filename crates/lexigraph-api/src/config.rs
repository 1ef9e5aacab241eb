//! Env-style service configuration.

use lexigraph_cache::CacheConfig;
use std::path::PathBuf;

pub const ENV_VOCAB_SOURCE: &str = "LEXIGRAPH_VOCAB_SOURCE";
pub const ENV_SNAPSHOT: &str = "LEXIGRAPH_SNAPSHOT";
pub const ENV_CACHE_HOURS: &str = "LEXIGRAPH_CACHE_HOURS";
pub const ENV_DEBUG: &str = "LEXIGRAPH_DEBUG";

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub vocab_source: PathBuf,
    pub snapshot_path: PathBuf,
    pub cache_hours: u64,
    /// Rebuild the snapshot on every access, bypassing the staleness window.
    pub debug: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            vocab_source: PathBuf::from("./vocab.ttl"),
            snapshot_path: PathBuf::from("./cache/vocab.snapshot"),
            cache_hours: 1,
            debug: false,
        }
    }
}

impl ServiceConfig {
    /// Read recognized options from the environment, keeping defaults for
    /// anything unset. A malformed hours value is ignored with a warning
    /// rather than failing startup.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(source) = std::env::var(ENV_VOCAB_SOURCE) {
            config.vocab_source = PathBuf::from(source);
        }
        if let Ok(snapshot) = std::env::var(ENV_SNAPSHOT) {
            config.snapshot_path = PathBuf::from(snapshot);
        }
        if let Ok(hours) = std::env::var(ENV_CACHE_HOURS) {
            match hours.parse::<u64>() {
                Ok(hours) => config.cache_hours = hours,
                Err(_) => {
                    tracing::warn!(value = %hours, "ignoring malformed {ENV_CACHE_HOURS}");
                }
            }
        }
        if let Ok(debug) = std::env::var(ENV_DEBUG) {
            config.debug = matches!(debug.to_lowercase().as_str(), "1" | "true" | "yes");
        }
        config
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            source: self.vocab_source.clone(),
            snapshot_path: self.snapshot_path.clone(),
            max_age_hours: self.cache_hours,
            force_rebuild: self.debug,
        }
    }
}
