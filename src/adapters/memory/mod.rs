//! In-process adapters for the store and traffic ports.

mod channel_source;
mod ghost_store;

pub use channel_source::{ChannelTrafficSource, TrafficPublisher};
pub use ghost_store::{InMemoryGhostStore, RecordedWrite};
