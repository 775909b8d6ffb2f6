//! Port for the expiring key/value store.

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::error::StoreResult;

/// Port for the key-value store that holds ghost records.
///
/// Keys are given relative to the store's namespace; adapters apply their
/// own prefix. Implementations only need single-key atomicity: one `SET`
/// with expiry and one atomic increment.
#[async_trait]
pub trait GhostStore: Send + Sync {
    /// Write `value` under `key`, replacing any previous value, expiring
    /// after `ttl`.
    async fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()>;

    /// Atomically add one to the integer at `key`, returning the new value.
    /// A missing key counts from zero.
    async fn increment(&self, key: &str) -> StoreResult<i64>;
}
