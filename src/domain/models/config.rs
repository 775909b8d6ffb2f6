//! Configuration model.

use serde::{Deserialize, Serialize};

/// Main configuration structure for chaos-brain
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Store and pub/sub transport
    #[serde(default)]
    pub redis: RedisConfig,

    /// Learning behaviour
    #[serde(default)]
    pub learner: LearnerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Redis connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RedisConfig {
    /// Host name or address; a trailing `:port` is honoured
    #[serde(default = "default_redis_host")]
    pub host: String,

    /// TCP port
    #[serde(default = "default_redis_port")]
    pub port: u16,

    /// Optional AUTH password
    #[serde(default)]
    pub password: Option<String>,

    /// Logical database index
    #[serde(default)]
    pub db: i64,

    /// Seconds allowed for connect and the initial PING
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_redis_host() -> String {
    "localhost".to_string()
}

const fn default_redis_port() -> u16 {
    6379
}

const fn default_connect_timeout_secs() -> u64 {
    5
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: default_redis_host(),
            port: default_redis_port(),
            password: None,
            db: 0,
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl RedisConfig {
    /// Resolve the effective host and port.
    ///
    /// `host` may be given as `host:port`, the form the proxy side uses for
    /// `REDIS_ADDR`; in that case the embedded port wins.
    pub fn endpoint(&self) -> (String, u16) {
        if let Some((host, port)) = self.host.rsplit_once(':') {
            if !host.is_empty() && !host.contains(':') {
                if let Ok(port) = port.parse::<u16>() {
                    return (host.to_string(), port);
                }
            }
        }
        (self.host.clone(), self.port)
    }

    /// Build a `redis://` connection URL.
    pub fn url(&self) -> String {
        let (host, port) = self.endpoint();
        match self.password.as_deref() {
            Some(password) if !password.is_empty() => {
                format!("redis://:{password}@{host}:{port}/{}", self.db)
            }
            _ => format!("redis://{host}:{port}/{}", self.db),
        }
    }

    /// Connection URL safe for logs.
    pub fn redacted_url(&self) -> String {
        let (host, port) = self.endpoint();
        match self.password.as_deref() {
            Some(password) if !password.is_empty() => {
                format!("redis://:***@{host}:{port}/{}", self.db)
            }
            _ => format!("redis://{host}:{port}/{}", self.db),
        }
    }
}

/// Learner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LearnerConfig {
    /// Pub/sub channel carrying traffic events
    #[serde(default = "default_channel")]
    pub channel: String,

    /// Prefix applied to every key written to the store
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Lifetime of a ghost record from its last write
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_channel() -> String {
    "chaos:traffic".to_string()
}

fn default_namespace() -> String {
    "chaos".to_string()
}

/// One hour.
pub const DEFAULT_GHOST_TTL_SECS: u64 = 3600;

const fn default_ttl_secs() -> u64 {
    DEFAULT_GHOST_TTL_SECS
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            channel: default_channel(),
            namespace: default_namespace(),
            ttl_secs: default_ttl_secs(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for a daily-rotated JSON log file
    #[serde(default)]
    pub log_dir: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
        }
    }
}
