//! Command-line interface.

pub mod commands;
pub mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;

/// Global flags and the subcommand to run.
#[derive(Parser, Debug)]
#[command(name = "chaos-brain")]
#[command(about = "chaos-brain - learns ghost responses from proxy traffic", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand; `run` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// YAML configuration file (defaults to ./chaos-brain.yaml when present)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Redis host, optionally with `:port`
    #[arg(long, global = true, value_name = "HOST")]
    pub redis_addr: Option<String>,

    /// Redis port
    #[arg(long, global = true, value_name = "PORT")]
    pub redis_port: Option<u16>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Subscribe to the traffic channel and learn until interrupted (default)
    Run,

    /// Print the resolved configuration without connecting
    Config,
}

impl Cli {
    /// Subcommand to execute; `run` when none was given.
    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Run)
    }

    /// Load configuration and apply flag overrides on top.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = ConfigLoader::load(self.config.as_deref())?;

        if let Some(addr) = &self.redis_addr {
            config.redis.host.clone_from(addr);
        }
        if let Some(port) = self.redis_port {
            config.redis.port = port;
        }
        if let Some(level) = &self.log_level {
            config.logging.level.clone_from(level);
        }

        ConfigLoader::validate(&config)?;
        Ok(config)
    }
}

/// Report a fatal command error and exit with status 1.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let chain: Vec<String> = err.chain().map(ToString::to_string).collect();
        let body = serde_json::json!({ "error": err.to_string(), "causes": chain });
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&body).unwrap_or_default()
        );
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
