//! Redis adapters: the ghost store and the traffic subscription.

mod connection;
mod ghost_store;
mod subscription;

pub use connection::RedisConnector;
pub use ghost_store::{namespaced_key, RedisGhostStore};
pub use subscription::RedisTrafficSource;
