use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use credentials::HashingCost;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub application: ApplicationConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub hashing: HashingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApplicationConfig {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

/// Argon2id cost used for new hashes
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct HashingConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl From<HashingConfig> for HashingCost {
    fn from(config: HashingConfig) -> Self {
        HashingCost {
            memory_kib: config.memory_kib,
            iterations: config.iterations,
            parallelism: config.parallelism,
        }
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        Self::load_from("config", &run_mode)
    }

    /// Load configuration rooted at `directory` for the given run mode.
    pub fn load_from(directory: &str, run_mode: &str) -> Result<Self, ConfigError> {
        ConfigBuilder::builder()
            .add_source(File::with_name(&format!("{}/default", directory)).required(false))
            .add_source(File::with_name(&format!("{}/{}", directory, run_mode)).required(false))
            // Example: DATABASE__URL=postgres://... overrides database.url
            .add_source(Environment::default().separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_file_is_complete() {
        let directory = concat!(env!("CARGO_MANIFEST_DIR"), "/config");
        let config = Config::load_from(directory, "test").expect("default config should load");

        assert_eq!(config.application.name, "chat-identity-service");
        assert!(config.database.max_connections > 0);
        assert!(config.server.http_port > 0);
    }

    #[test]
    fn test_hashing_config_converts_to_cost() {
        let cost = HashingCost::from(HashingConfig {
            memory_kib: 4096,
            iterations: 3,
            parallelism: 2,
        });

        assert_eq!(
            cost,
            HashingCost {
                memory_kib: 4096,
                iterations: 3,
                parallelism: 2,
            }
        );
    }
}
