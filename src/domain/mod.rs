//! Domain layer for chaos-brain
//!
//! This module contains the traffic-learning models and the port traits the
//! learner and consumer depend on.

pub mod error;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use error::{ConsumerError, StoreError, StoreResult, TransportError};
