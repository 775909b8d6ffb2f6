//! Common test utilities for integration tests
//!
//! Provides shared fixtures and test doubles used across multiple
//! integration test files.

use async_trait::async_trait;
use chaos_brain::domain::models::{LearnOutcome, SkipReason, TrafficEvent};
use chaos_brain::domain::ports::TrafficLearner;
use chaos_brain::StoreError;
use serde_json::json;
use tokio::sync::Mutex;

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
#[allow(dead_code)]
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Serialize a traffic event the way the capture proxy publishes it.
#[allow(dead_code)]
pub fn traffic_payload(method: &str, path: &str, status: u16, body: &str) -> Vec<u8> {
    json!({
        "timestamp": "2025-01-01T00:00:00Z",
        "method": method,
        "path": path,
        "request_body": "",
        "status": status,
        "response_body": body,
        "duration": "1.5ms",
    })
    .to_string()
    .into_bytes()
}

/// How a [`RecordingLearner`] reacts to a given path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum Reaction {
    Skip,
    Fail,
    Panic,
}

/// Learner double that records every event it is given.
#[derive(Default)]
pub struct RecordingLearner {
    seen: Mutex<Vec<TrafficEvent>>,
    reactions: Vec<(String, Reaction)>,
}

#[allow(dead_code)]
impl RecordingLearner {
    pub fn new() -> Self {
        Self::default()
    }

    /// React to events for `path` with `reaction` instead of skipping.
    pub fn reacting(mut self, path: &str, reaction: Reaction) -> Self {
        self.reactions.push((path.to_string(), reaction));
        self
    }

    pub async fn seen(&self) -> Vec<TrafficEvent> {
        self.seen.lock().await.clone()
    }

    pub async fn seen_paths(&self) -> Vec<String> {
        self.seen
            .lock()
            .await
            .iter()
            .filter_map(|event| event.path.clone())
            .collect()
    }

    fn reaction_for(&self, event: &TrafficEvent) -> Reaction {
        self.reactions
            .iter()
            .find(|(path, _)| event.path.as_deref() == Some(path.as_str()))
            .map_or(Reaction::Skip, |(_, reaction)| *reaction)
    }
}

#[async_trait]
impl TrafficLearner for RecordingLearner {
    async fn learn(&self, event: TrafficEvent) -> Result<LearnOutcome, StoreError> {
        let reaction = self.reaction_for(&event);
        self.seen.lock().await.push(event);

        match reaction {
            Reaction::Skip => Ok(LearnOutcome::Skipped {
                reason: SkipReason::MissingStatus,
            }),
            Reaction::Fail => Err(StoreError::Backend("counter unavailable".to_string())),
            Reaction::Panic => panic!("learner blew up"),
        }
    }
}
