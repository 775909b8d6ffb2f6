//! Process-local ghost store.
//!
//! Mirrors the subset of Redis semantics the learner relies on: `SET` with
//! expiry replaces the value and resets the TTL, `INCR` treats a missing key
//! as zero and rejects non-integer values. Every write is recorded so tests
//! can assert on exactly what was sent, and failures can be injected per
//! operation.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::domain::error::{StoreError, StoreResult};
use crate::domain::ports::GhostStore;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// A `set_with_expiry` call as received by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedWrite {
    /// Key as passed in, without namespace
    pub key: String,
    /// Stored value
    pub value: String,
    /// Requested expiry
    pub ttl: Duration,
}

/// In-memory `GhostStore` with expiry and failure injection.
#[derive(Debug, Default)]
pub struct InMemoryGhostStore {
    entries: RwLock<HashMap<String, Entry>>,
    writes: RwLock<Vec<RecordedWrite>>,
    increments: RwLock<Vec<String>>,
    fail_writes: AtomicBool,
    fail_increments: AtomicBool,
}

impl InMemoryGhostStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set_with_expiry` fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `increment` fail (or succeed again).
    pub fn set_fail_increments(&self, fail: bool) {
        self.fail_increments.store(fail, Ordering::SeqCst);
    }

    /// Current value at `key`, if present and not expired.
    pub async fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone())
    }

    /// Remaining lifetime of `key`, if it has one.
    pub async fn ttl(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .and_then(|entry| entry.expires_at)
            .map(|at| at.saturating_duration_since(now))
    }

    /// Integer value of a counter key; missing counts as zero.
    pub async fn counter(&self, key: &str) -> i64 {
        self.get(key)
            .await
            .and_then(|value| value.parse().ok())
            .unwrap_or(0)
    }

    /// Every successful write, in order.
    pub async fn writes(&self) -> Vec<RecordedWrite> {
        self.writes.read().await.clone()
    }

    /// Keys of every successful increment, in order.
    pub async fn increments(&self) -> Vec<String> {
        self.increments.read().await.clone()
    }

    /// Number of live keys.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries.values().filter(|entry| entry.is_live(now)).count()
    }

    /// Whether no live keys remain.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl GhostStore for InMemoryGhostStore {
    async fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected write failure".to_string()));
        }

        let entry = Entry {
            value: value.to_string(),
            expires_at: Some(Instant::now() + ttl),
        };
        self.entries.write().await.insert(key.to_string(), entry);
        self.writes.write().await.push(RecordedWrite {
            key: key.to_string(),
            value: value.to_string(),
            ttl,
        });
        Ok(())
    }

    async fn increment(&self, key: &str) -> StoreResult<i64> {
        if self.fail_increments.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected counter failure".to_string()));
        }

        let now = Instant::now();
        let next = {
            let mut entries = self.entries.write().await;
            let live = entries.get(key).filter(|entry| entry.is_live(now));
            let (current, expires_at) = match live {
                Some(entry) => {
                    let Ok(current) = entry.value.parse::<i64>() else {
                        return Err(StoreError::NotAnInteger {
                            key: key.to_string(),
                        });
                    };
                    (current, entry.expires_at)
                }
                None => (0, None),
            };
            let next = current + 1;
            entries.insert(
                key.to_string(),
                Entry {
                    value: next.to_string(),
                    expires_at,
                },
            );
            next
        };

        self.increments.write().await.push(key.to_string());
        Ok(next)
    }
}
