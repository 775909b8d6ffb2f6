//! Implementation of the `chaos-brain config` command.

use anyhow::Result;
use serde::Serialize;

use crate::adapters::redis::namespaced_key;
use crate::cli::output::{output, CommandOutput};
use crate::cli::Cli;
use crate::domain::models::{Config, GHOST_KEY_SEGMENT, REQUEST_COUNTER_KEY};

/// Resolved configuration as printed by `chaos-brain config`.
#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    /// Effective configuration, password masked
    pub config: Config,
    /// Connection URL, password masked
    pub redis_url: String,
    /// Where ghost records are written
    pub ghost_key_pattern: String,
    /// Where observations are counted
    pub counter_key: String,
}

impl ConfigOutput {
    /// Build the printable view, masking the password.
    pub fn new(mut config: Config) -> Self {
        let redis_url = config.redis.redacted_url();
        if config.redis.password.is_some() {
            config.redis.password = Some("***".to_string());
        }
        let namespace = config.learner.namespace.as_str();
        let ghost_pattern = format!("{GHOST_KEY_SEGMENT}:{{method}}:{{path}}");
        Self {
            redis_url,
            ghost_key_pattern: namespaced_key(namespace, &ghost_pattern),
            counter_key: namespaced_key(namespace, REQUEST_COUNTER_KEY),
            config,
        }
    }
}

impl CommandOutput for ConfigOutput {
    fn to_human(&self) -> String {
        let yaml = serde_yaml::to_string(&self.config).unwrap_or_default();
        [
            format!("Redis:        {}", self.redis_url),
            format!("Channel:      {}", self.config.learner.channel),
            format!("Ghost keys:   {}", self.ghost_key_pattern),
            format!("Counter key:  {}", self.counter_key),
            format!("Ghost TTL:    {}s", self.config.learner.ttl_secs),
            String::new(),
            yaml.trim_end().to_string(),
        ]
        .join("\n")
    }
}

/// Print the resolved configuration without connecting.
pub fn execute(cli: &Cli) -> Result<()> {
    let config = cli.load_config()?;
    output(&ConfigOutput::new(config), cli.json);
    Ok(())
}
