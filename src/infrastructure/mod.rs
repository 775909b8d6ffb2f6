//! Infrastructure layer module
//!
//! Process bootstrap concerns:
//! - Configuration management
//! - Logging infrastructure

pub mod config;
pub mod logging;
