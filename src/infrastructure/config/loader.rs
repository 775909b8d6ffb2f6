//! Layered configuration loading and validation.

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Default project config file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "chaos-brain.yaml";

/// Prefix for nested environment overrides (`BRAIN_LEARNER__TTL_SECS`).
pub const ENV_PREFIX: &str = "BRAIN_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `redis.host` is blank
    #[error("Redis host cannot be empty")]
    EmptyRedisHost,

    /// `redis.port` is zero
    #[error("Invalid redis port: {0}. Must be between 1 and 65535")]
    InvalidRedisPort(u16),

    /// `redis.connect_timeout_secs` is zero
    #[error("Invalid connect_timeout_secs: {0}. Must be at least 1")]
    InvalidConnectTimeout(u64),

    /// `learner.channel` is blank
    #[error("Traffic channel cannot be empty")]
    EmptyChannel,

    /// `learner.namespace` contains whitespace
    #[error("Invalid namespace: {0:?}. Must not contain whitespace")]
    InvalidNamespace(String),

    /// `learner.ttl_secs` is zero
    #[error("Invalid ttl_secs: {0}. Must be at least 1")]
    InvalidTtl(u64),

    /// `logging.level` is not a known level
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// `logging.format` is neither json nor pretty
    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. `chaos-brain.yaml`, or `path` when given
    /// 3. Environment variables (BRAIN_* prefix, `__` for nesting)
    /// 4. `REDIS_ADDR`, `REDIS_PORT`, `REDIS_PASSWORD`
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let config: Config = Self::figment(file)
            .extract()
            .with_context(|| format!("Failed to load config file {}", file.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// The merged provider chain, before extraction.
    pub fn figment(file: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(Self::transport_env())
    }

    /// The plain transport variables shared with the proxy and dashboard.
    fn transport_env() -> Env {
        Env::raw().filter_map(|key| {
            let path = transport_key(key.as_str())?;
            Some(path.into())
        })
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.redis.host.trim().is_empty() {
            return Err(ConfigError::EmptyRedisHost);
        }

        if config.redis.port == 0 {
            return Err(ConfigError::InvalidRedisPort(config.redis.port));
        }

        if config.redis.connect_timeout_secs == 0 {
            return Err(ConfigError::InvalidConnectTimeout(
                config.redis.connect_timeout_secs,
            ));
        }

        if config.learner.channel.trim().is_empty() {
            return Err(ConfigError::EmptyChannel);
        }

        if config.learner.namespace.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidNamespace(
                config.learner.namespace.clone(),
            ));
        }

        if config.learner.ttl_secs == 0 {
            return Err(ConfigError::InvalidTtl(config.learner.ttl_secs));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        let level = config.logging.level.as_str();
        if !valid_log_levels.contains(&level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(level.to_string()));
        }

        let valid_log_formats = ["json", "pretty"];
        let format = config.logging.format.as_str();
        if !valid_log_formats.contains(&format) {
            return Err(ConfigError::InvalidLogFormat(format.to_string()));
        }

        Ok(())
    }
}

/// Config path fed by one of the plain `REDIS_*` variables.
fn transport_key(name: &str) -> Option<&'static str> {
    match name.to_ascii_uppercase().as_str() {
        "REDIS_ADDR" => Some("redis.host"),
        "REDIS_PORT" => Some("redis.port"),
        "REDIS_PASSWORD" => Some("redis.password"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TRANSPORT_VARS: [(&str, Option<&str>); 3] = [
        ("REDIS_ADDR", None),
        ("REDIS_PORT", None),
        ("REDIS_PASSWORD", None),
    ];

    const FILE_YAML: &str = "
redis:
  host: from-file
  port: 7000
learner:
  ttl_secs: 60
";

    fn missing_file() -> &'static Path {
        Path::new("/nonexistent/chaos-brain.yaml")
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(ConfigLoader::validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        temp_env::with_vars(TRANSPORT_VARS, || {
            let config = ConfigLoader::load(Some(missing_file())).unwrap();
            assert_eq!(config.redis.host, "localhost");
            assert_eq!(config.redis.port, 6379);
            assert_eq!(config.learner.ttl_secs, 3600);
        });
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
redis:
  host: redis.internal
  port: 6380
learner:
  channel: staging:traffic
  namespace: staging
  ttl_secs: 600
logging:
  level: debug
  format: json
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.redis.host, "redis.internal");
        assert_eq!(config.redis.port, 6380);
        assert_eq!(config.learner.channel, "staging:traffic");
        assert_eq!(config.learner.namespace, "staging");
        assert_eq!(config.learner.ttl_secs, 600);
        assert_eq!(config.logging.format, "json");

        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn test_file_then_env_override() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{FILE_YAML}").unwrap();
        file.flush().unwrap();

        temp_env::with_vars(
            [
                ("REDIS_ADDR", Some("from-env")),
                ("REDIS_PORT", None),
                ("REDIS_PASSWORD", None),
                ("BRAIN_LEARNER__TTL_SECS", Some("90")),
            ],
            || {
                let config = ConfigLoader::load(Some(file.path())).unwrap();
                assert_eq!(config.redis.host, "from-env", "env should beat the file");
                assert_eq!(config.redis.port, 7000, "file value should persist");
                assert_eq!(config.learner.ttl_secs, 90);
            },
        );
    }

    #[test]
    fn test_redis_port_env() {
        temp_env::with_vars(
            [
                ("REDIS_ADDR", None),
                ("REDIS_PORT", Some("6390")),
                ("REDIS_PASSWORD", Some("pw")),
            ],
            || {
                let config = ConfigLoader::load(Some(missing_file())).unwrap();
                assert_eq!(config.redis.port, 6390);
                assert_eq!(config.redis.password.as_deref(), Some("pw"));
            },
        );
    }

    #[test]
    fn test_transport_keys() {
        assert_eq!(transport_key("REDIS_ADDR"), Some("redis.host"));
        assert_eq!(transport_key("redis_port"), Some("redis.port"));
        assert_eq!(transport_key("REDIS_PASSWORD"), Some("redis.password"));
        assert_eq!(transport_key("REDIS_DB"), None);
    }

    #[test]
    fn test_validate_empty_host() {
        let mut config = Config::default();
        config.redis.host = "  ".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyRedisHost)
        ));
    }

    #[test]
    fn test_validate_zero_port() {
        let mut config = Config::default();
        config.redis.port = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidRedisPort(0))
        ));
    }

    #[test]
    fn test_validate_zero_ttl() {
        let mut config = Config::default();
        config.learner.ttl_secs = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidTtl(0))
        ));
    }

    #[test]
    fn test_validate_empty_channel() {
        let mut config = Config::default();
        config.learner.channel = String::new();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyChannel)
        ));
    }

    #[test]
    fn test_validate_namespace_with_space() {
        let mut config = Config::default();
        config.learner.namespace = "chaos proxy".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidNamespace(_))
        ));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "invalid".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogLevel(level) => assert_eq!(level, "invalid"),
            other => panic!("Expected InvalidLogLevel error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogFormat(format) => assert_eq!(format, "xml"),
            other => panic!("Expected InvalidLogFormat error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_zero_connect_timeout() {
        let mut config = Config::default();
        config.redis.connect_timeout_secs = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidConnectTimeout(0))
        ));
    }
}
