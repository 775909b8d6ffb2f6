//! chaos-brain - traffic learner for the chaos proxy
//!
//! Subscribes to the traffic events the proxy publishes and keeps a "ghost"
//! cache: the last successful response seen for every method and path,
//! stored with an expiry so the proxy can replay it when the backend is
//! down.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): traffic models and port traits
//! - **Service Layer** (`services`): the learner and the consume loop
//! - **Adapters** (`adapters`): Redis and in-memory port implementations
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use chaos_brain::adapters::memory::InMemoryGhostStore;
//! use chaos_brain::domain::models::TrafficEvent;
//! use chaos_brain::domain::ports::TrafficLearner;
//! use chaos_brain::services::Learner;
//!
//! # tokio_test::block_on(async {
//! let store = Arc::new(InMemoryGhostStore::new());
//! let learner = Learner::new(store.clone());
//!
//! let event = TrafficEvent::from_slice(
//!     br#"{"method":"GET","path":"/api/users","status":200,"response_body":"[]"}"#,
//! ).unwrap();
//! assert!(learner.learn(event).await.unwrap().is_learned());
//! assert!(store.get("ghost:GET:/api/users").await.is_some());
//! # });
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    Config, GhostKey, GhostResponse, LearnOutcome, LearnerConfig, LoggingConfig, RedisConfig,
    SkipReason, TrafficEvent,
};
pub use domain::ports::{GhostStore, InboundMessage, MessageKind, TrafficLearner, TrafficSource};
pub use domain::{ConsumerError, StoreError, TransportError};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{ConsumerStats, EventConsumer, Learner};
