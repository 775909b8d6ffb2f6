//! Consume loop turning channel messages into `learn` calls.
//!
//! One message is processed at a time. A message that fails to decode, a
//! learner error, or a learner panic is logged and the loop moves on; only
//! the shutdown signal or the end of the subscription stops it.

use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::domain::error::ConsumerError;
use crate::domain::models::{LearnOutcome, TrafficEvent};
use crate::domain::ports::{InboundMessage, MessageKind, TrafficLearner, TrafficSource};

/// Counters for one consumer session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsumerStats {
    /// Frames received from the source
    pub received: u64,
    /// Frames that were not traffic messages for our channel
    pub ignored: u64,
    /// Payloads that were not a valid traffic event
    pub decode_failures: u64,
    /// Events turned into ghost records
    pub learned: u64,
    /// Events that did not qualify
    pub skipped: u64,
    /// Qualifying events whose write failed
    pub write_failures: u64,
    /// `learn` calls that returned an error or panicked
    pub learn_errors: u64,
}

impl ConsumerStats {
    /// Events successfully handed to the learner.
    pub const fn observed(&self) -> u64 {
        self.learned + self.skipped + self.write_failures + self.learn_errors
    }

    fn record(&mut self, outcome: &LearnOutcome) {
        match outcome {
            LearnOutcome::Learned { .. } => self.learned += 1,
            LearnOutcome::Skipped { .. } => self.skipped += 1,
            LearnOutcome::WriteFailed { .. } => self.write_failures += 1,
        }
    }

    fn log_summary(&self) {
        info!(
            received = self.received,
            ignored = self.ignored,
            decode_failures = self.decode_failures,
            learned = self.learned,
            skipped = self.skipped,
            write_failures = self.write_failures,
            learn_errors = self.learn_errors,
            "consumer session summary"
        );
    }
}

/// Feeds every traffic message from a source into a learner.
pub struct EventConsumer<S: TrafficSource> {
    source: S,
    learner: Arc<dyn TrafficLearner>,
    stats: ConsumerStats,
}

impl<S: TrafficSource> EventConsumer<S> {
    /// Create a consumer with empty counters.
    pub fn new(source: S, learner: Arc<dyn TrafficLearner>) -> Self {
        Self {
            source,
            learner,
            stats: ConsumerStats::default(),
        }
    }

    /// Counters so far.
    pub const fn stats(&self) -> &ConsumerStats {
        &self.stats
    }

    /// Consume until `shutdown` resolves or the source ends.
    ///
    /// `shutdown` is only observed while waiting for the next message, so a
    /// message already being processed runs to completion. A source that
    /// ends on its own is reported as [`ConsumerError::SourceClosed`].
    /// Counters stay readable through [`Self::stats`] either way.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<(), ConsumerError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        info!(channel = %self.source.channel(), "ready to learn");

        loop {
            let next = tokio::select! {
                biased;
                () = &mut shutdown => {
                    info!("shutting down");
                    break;
                }
                next = self.source.next_message() => next,
            };

            let Some(message) = next else {
                warn!(channel = %self.source.channel(), "traffic subscription closed");
                self.stats.log_summary();
                return Err(ConsumerError::SourceClosed);
            };

            self.handle(message).await;
        }

        self.stats.log_summary();
        Ok(())
    }

    /// Process one frame.
    pub async fn handle(&mut self, message: InboundMessage) {
        self.stats.received += 1;

        if message.kind != MessageKind::Message || message.channel != self.source.channel() {
            debug!(kind = ?message.kind, channel = %message.channel, "ignoring frame");
            self.stats.ignored += 1;
            return;
        }

        let event = match TrafficEvent::from_slice(&message.payload) {
            Ok(event) => event,
            Err(e) => {
                error!(
                    error = %e,
                    bytes = message.payload.len(),
                    "failed to decode traffic message"
                );
                self.stats.decode_failures += 1;
                return;
            }
        };

        debug!(
            method = event.method.as_deref().unwrap_or("-"),
            path = event.path.as_deref().unwrap_or("-"),
            status = ?event.status,
            "captured"
        );

        let learning = AssertUnwindSafe(self.learner.learn(event)).catch_unwind();
        match learning.await {
            Ok(Ok(outcome)) => self.stats.record(&outcome),
            Ok(Err(e)) => {
                error!(error = %e, "error processing message");
                self.stats.learn_errors += 1;
            }
            Err(_) => {
                error!("learner panicked while processing message");
                self.stats.learn_errors += 1;
            }
        }
    }
}
