//! Domain models for traffic learning.

pub mod config;
pub mod learning;
pub mod traffic;

pub use config::{Config, LearnerConfig, LoggingConfig, RedisConfig, DEFAULT_GHOST_TTL_SECS};
pub use learning::{LearnOutcome, SkipReason};
pub use traffic::{GhostKey, GhostResponse, TrafficEvent, GHOST_KEY_SEGMENT, REQUEST_COUNTER_KEY};
