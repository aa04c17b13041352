//! TOML-loaded node configuration.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the `triechain-node` binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub node: NodeConfig,
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
}

/// Node identity and bookkeeping knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Node name, used only for log context.
    pub name: String,
}

/// Parameters for the periodic cache-flush task (§9).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How often the flush task wakes up, in seconds.
    pub flush_interval_secs: u64,
    /// Flush early if the acceptance cache grows past this many entries.
    pub size_threshold: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Passed to `tracing_subscriber::EnvFilter` when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            name: "triechain-node".to_string(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            flush_interval_secs: 30,
            size_threshold: 10_000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            node: NodeConfig::default(),
            cache: CacheConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Save configuration to a TOML file.
    pub fn to_file(&self, path: &str) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = Config::default();
        let rendered = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.cache.flush_interval_secs, config.cache.flush_interval_secs);
    }

    #[test]
    fn round_trips_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let path = path.to_str().unwrap();

        let config = Config::default();
        config.to_file(path).unwrap();
        let loaded = Config::from_file(path).unwrap();
        assert_eq!(loaded.node.name, config.node.name);
    }
}
