//! Port for turning traffic events into ghost records.

use async_trait::async_trait;

use crate::domain::error::StoreResult;
use crate::domain::models::{LearnOutcome, TrafficEvent};

/// Port for whatever turns observed traffic into ghost records.
///
/// The consumer only ever calls `learn`, so a richer model can replace the
/// last-response learner without touching the consume loop.
#[async_trait]
pub trait TrafficLearner: Send + Sync {
    /// Observe one event. Errors returned here are logged by the caller,
    /// which keeps consuming.
    async fn learn(&self, event: TrafficEvent) -> StoreResult<LearnOutcome>;
}
