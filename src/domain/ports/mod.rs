//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that adapters must implement:
//! - GhostStore: key-value store with expiry and atomic increment
//! - TrafficSource: live subscription to the traffic channel
//! - TrafficLearner: the learning decision the consumer delegates to
//!
//! These traits keep the learner and consumer independent of Redis.

pub mod ghost_store;
pub mod traffic_learner;
pub mod traffic_source;

pub use ghost_store::GhostStore;
pub use traffic_learner::TrafficLearner;
pub use traffic_source::{InboundMessage, MessageKind, TrafficSource};
