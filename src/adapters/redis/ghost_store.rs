//! `GhostStore` over a multiplexed Redis connection.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::time::Duration;

use crate::domain::error::{StoreError, StoreResult};
use crate::domain::ports::GhostStore;

/// `GhostStore` over a multiplexed Redis connection.
///
/// Every key is written under `{namespace}:`, so the learner's
/// `ghost:GET:/api/users` lands at `chaos:ghost:GET:/api/users` with the
/// default namespace.
#[derive(Clone)]
pub struct RedisGhostStore {
    conn: MultiplexedConnection,
    namespace: String,
}

impl RedisGhostStore {
    /// Wrap an open connection; keys are written under `namespace`.
    pub fn new(conn: MultiplexedConnection, namespace: impl Into<String>) -> Self {
        Self {
            conn,
            namespace: namespace.into(),
        }
    }

    /// Fully qualified Redis key for `key`.
    pub fn qualify(&self, key: &str) -> String {
        namespaced_key(&self.namespace, key)
    }
}

/// Prefix `key` with `namespace`; an empty namespace leaves it untouched.
pub fn namespaced_key(namespace: &str, key: &str) -> String {
    if namespace.is_empty() {
        key.to_string()
    } else {
        format!("{namespace}:{key}")
    }
}

fn backend(err: &redis::RedisError) -> StoreError {
    StoreError::Backend(err.to_string())
}

#[async_trait]
impl GhostStore for RedisGhostStore {
    async fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        // Redis rejects EX 0.
        let seconds = ttl.as_secs().max(1);
        let _: () = conn
            .set_ex(self.qualify(key), value, seconds)
            .await
            .map_err(|e| backend(&e))?;
        Ok(())
    }

    async fn increment(&self, key: &str) -> StoreResult<i64> {
        let mut conn = self.conn.clone();
        let value: i64 = conn
            .incr(self.qualify(key), 1)
            .await
            .map_err(|e| backend(&e))?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespaced_key() {
        assert_eq!(
            namespaced_key("chaos", "ghost:GET:/api/users"),
            "chaos:ghost:GET:/api/users"
        );
        assert_eq!(
            namespaced_key("chaos", "stats:request_count"),
            "chaos:stats:request_count"
        );
    }

    #[test]
    fn test_empty_namespace_is_passthrough() {
        assert_eq!(namespaced_key("", "ghost:GET:/"), "ghost:GET:/");
    }
}
