//! Connection setup for the Redis store and subscription.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, info};

use super::ghost_store::RedisGhostStore;
use super::subscription::RedisTrafficSource;
use crate::domain::error::TransportError;
use crate::domain::models::RedisConfig;

/// Opens connections to one Redis server.
///
/// Every step is bounded by the configured connect timeout; failures here
/// are fatal to the process.
pub struct RedisConnector {
    client: redis::Client,
    url: String,
    timeout: Duration,
}

impl RedisConnector {
    /// Validate the connection settings without touching the network.
    pub fn new(config: &RedisConfig) -> Result<Self, TransportError> {
        let url = config.redacted_url();
        let client = match redis::Client::open(config.url()) {
            Ok(client) => client,
            Err(e) => {
                return Err(TransportError::InvalidUrl {
                    url,
                    reason: e.to_string(),
                });
            }
        };

        Ok(Self {
            client,
            url,
            timeout: Duration::from_secs(config.connect_timeout_secs),
        })
    }

    /// Connection URL with the password masked.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Open the multiplexed command connection and confirm it with a PING.
    pub async fn connect_store(&self, namespace: &str) -> Result<RedisGhostStore, TransportError> {
        info!(url = %self.url, "connecting to redis");

        let mut conn = self
            .bounded(self.client.get_multiplexed_async_connection())
            .await?;

        let pong: String = self
            .bounded(redis::cmd("PING").query_async(&mut conn))
            .await?;
        debug!(reply = %pong, "redis ping");

        Ok(RedisGhostStore::new(conn, namespace))
    }

    /// Open a dedicated pub/sub connection subscribed to `channel`.
    pub async fn subscribe(&self, channel: &str) -> Result<RedisTrafficSource, TransportError> {
        let mut pubsub = self.bounded(self.client.get_async_pubsub()).await?;

        self.timed(pubsub.subscribe(channel))
            .await?
            .map_err(|e| TransportError::Subscribe {
                channel: channel.to_string(),
                reason: e.to_string(),
            })?;

        info!(channel = %channel, "subscribed to traffic channel");
        Ok(RedisTrafficSource::new(channel, pubsub))
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, TransportError>
    where
        F: Future<Output = redis::RedisResult<T>>,
    {
        self.timed(fut).await?.map_err(|e| TransportError::Connect {
            url: self.url.clone(),
            reason: e.to_string(),
        })
    }

    /// Run one startup step under the connect timeout.
    async fn timed<T, F>(&self, fut: F) -> Result<T, TransportError>
    where
        F: Future<Output = T>,
    {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| TransportError::Timeout {
                url: self.url.clone(),
                seconds: self.timeout.as_secs(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[test]
    fn test_connector_accepts_default_config() {
        let config = RedisConfig::default();
        let connector = RedisConnector::new(&config).expect("valid config");
        assert_eq!(connector.url(), "redis://localhost:6379/0");
    }

    #[test]
    fn test_connector_masks_password() {
        let config = RedisConfig {
            password: Some("secret".to_string()),
            ..Default::default()
        };
        let connector = RedisConnector::new(&config).expect("valid config");
        assert!(!connector.url().contains("secret"));
    }

    #[tokio::test]
    async fn test_unreachable_server_fails_fast() {
        // Port 1 is reserved and refuses connections on any sane host.
        let config = RedisConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            connect_timeout_secs: 1,
            ..Default::default()
        };
        let connector = RedisConnector::new(&config).expect("valid config");

        let result = connector.connect_store("chaos").await;
        assert!(matches!(
            result,
            Err(TransportError::Connect { .. } | TransportError::Timeout { .. })
        ));
    }

    /// Accepts connections and never answers.
    async fn silent_server() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        port
    }

    #[tokio::test]
    async fn test_silent_server_times_out_on_subscribe() {
        let config = RedisConfig {
            host: "127.0.0.1".to_string(),
            port: silent_server().await,
            connect_timeout_secs: 1,
            ..Default::default()
        };
        let connector = RedisConnector::new(&config).expect("valid config");

        let attempt = connector.subscribe("chaos:traffic");
        let result = tokio::time::timeout(Duration::from_secs(10), attempt)
            .await
            .expect("subscribe must give up on its own");

        assert!(matches!(result, Err(TransportError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_silent_server_times_out_on_ping() {
        let config = RedisConfig {
            host: "127.0.0.1".to_string(),
            port: silent_server().await,
            connect_timeout_secs: 1,
            ..Default::default()
        };
        let connector = RedisConnector::new(&config).expect("valid config");

        let attempt = connector.connect_store("chaos");
        let result = tokio::time::timeout(Duration::from_secs(10), attempt)
            .await
            .expect("connect must give up on its own");

        assert!(matches!(result, Err(TransportError::Timeout { .. })));
    }
}
