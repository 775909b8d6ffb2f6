//! Last-response learner.
//!
//! Remembers the most recent 2xx response seen for every method and path,
//! and counts every event it is shown.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

use crate::domain::error::StoreResult;
use crate::domain::models::{
    GhostResponse, LearnOutcome, SkipReason, TrafficEvent, DEFAULT_GHOST_TTL_SECS,
    REQUEST_COUNTER_KEY,
};
use crate::domain::ports::{GhostStore, TrafficLearner};

/// Caches the last successful response per route.
///
/// Holds no traffic state of its own: the expiring records in the store are
/// the whole model.
pub struct Learner {
    store: Arc<dyn GhostStore>,
    ttl: Duration,
}

impl Learner {
    /// Create a learner with the default one-hour TTL.
    pub fn new(store: Arc<dyn GhostStore>) -> Self {
        Self::with_ttl(store, Duration::from_secs(DEFAULT_GHOST_TTL_SECS))
    }

    /// Create a learner with a custom TTL.
    pub fn with_ttl(store: Arc<dyn GhostStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Lifetime given to every record written.
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    fn classify(event: &TrafficEvent) -> Result<(), SkipReason> {
        match event.known_status() {
            None => Err(SkipReason::MissingStatus),
            Some(_) if event.is_success() => Ok(()),
            Some(status) => Err(SkipReason::NonSuccessStatus(status)),
        }
    }

    async fn save_ghost_response(&self, event: &TrafficEvent) -> LearnOutcome {
        let Some(key) = event.ghost_key() else {
            return LearnOutcome::Skipped {
                reason: SkipReason::MissingRoute,
            };
        };

        let ghost = GhostResponse::from_event(event);
        let written = match ghost.to_json() {
            Ok(json) => {
                self.store
                    .set_with_expiry(key.as_str(), &json, self.ttl)
                    .await
            }
            Err(e) => Err(e.into()),
        };

        match written {
            Ok(()) => {
                info!(key = %key, ttl_secs = self.ttl.as_secs(), "learned pattern");
                LearnOutcome::Learned { key }
            }
            Err(e) => {
                error!(key = %key, error = %e, "failed to save ghost response");
                LearnOutcome::WriteFailed { key }
            }
        }
    }
}

#[async_trait]
impl TrafficLearner for Learner {
    #[instrument(
        skip(self, event),
        fields(method = ?event.method, path = ?event.path, status = ?event.status)
    )]
    async fn learn(&self, event: TrafficEvent) -> StoreResult<LearnOutcome> {
        let outcome = match Self::classify(&event) {
            Ok(()) => self.save_ghost_response(&event).await,
            Err(reason) => LearnOutcome::Skipped { reason },
        };

        if let LearnOutcome::Skipped { reason } = &outcome {
            debug!(%reason, "not learned");
        }

        // Counted whatever happened above, independently of the write.
        let observed = self.store.increment(REQUEST_COUNTER_KEY).await?;
        debug!(observed, "traffic observed");

        Ok(outcome)
    }
}
