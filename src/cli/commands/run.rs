//! Implementation of the `chaos-brain run` command.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::adapters::redis::RedisConnector;
use crate::cli::Cli;
use crate::infrastructure::logging::LoggerImpl;
use crate::services::{EventConsumer, Learner};

/// Resolves on the first Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "could not install Ctrl-C handler; running until killed");
        std::future::pending::<()>().await;
    }
}

/// Connect, subscribe and learn until Ctrl-C or the subscription ends.
pub async fn execute(cli: &Cli) -> Result<()> {
    let config = cli.load_config()?;
    let _logger = LoggerImpl::init(&config.logging)?;

    info!(version = env!("CARGO_PKG_VERSION"), "starting chaos-brain");

    let connector = RedisConnector::new(&config.redis)?;
    let store = connector
        .connect_store(&config.learner.namespace)
        .await
        .inspect_err(|e| error!(error = %e, "could not connect to redis; is it running?"))
        .context("Failed to connect to Redis")?;
    let source = connector
        .subscribe(&config.learner.channel)
        .await
        .inspect_err(|e| error!(error = %e, "could not subscribe to traffic channel"))
        .context("Failed to subscribe to traffic channel")?;

    let learner = Learner::with_ttl(
        Arc::new(store),
        Duration::from_secs(config.learner.ttl_secs),
    );
    let mut consumer = EventConsumer::new(source, Arc::new(learner));

    consumer
        .run(shutdown_signal())
        .await
        .inspect_err(|e| error!(error = %e, "traffic consumer stopped"))
        .context("Traffic consumer stopped unexpectedly")?;

    let stats = consumer.stats();
    info!(
        observed = stats.observed(),
        learned = stats.learned,
        "stopped"
    );
    Ok(())
}
