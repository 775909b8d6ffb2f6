//! Service layer: the learner and the loop that feeds it.

pub mod event_consumer;
pub mod learner;

pub use event_consumer::{ConsumerStats, EventConsumer};
pub use learner::Learner;
