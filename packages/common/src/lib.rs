//! Common infrastructure shared by the kidset crates
//!
//! This crate provides:
//! - Structured logging setup on top of `env_logger`, with hashing helpers so
//!   claim values never reach the logs in clear text
//! - The `KidsetConfig` configuration layer (JSON file, environment overrides)

pub mod config;
pub mod logging;

pub use config::{ConfigError, KidsetConfig};
pub use logging::LoggingTransformer;
