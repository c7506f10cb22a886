//! Structured logging infrastructure
//!
//! Provides env_logger-based logging with secure handling of sensitive data
//! and proper integration with the standard log crate.

use log::{debug, info, warn};
use sha2::{Digest, Sha256};
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Logging entry points used by the library crates and the CLI
pub struct LoggingTransformer;

impl LoggingTransformer {
    /// Initialize logging system (should be called once at application startup)
    ///
    /// Configure logging levels via `RUST_LOG` environment variable:
    /// - `RUST_LOG=debug` - Enable all debug logs
    /// - `RUST_LOG=info` - Enable info and above (recommended for production)
    /// - `RUST_LOG=kidset_key=debug,kidset_jwt=info` - Module-specific levels
    pub fn init() {
        Self::init_with_filter(None);
    }

    /// Initialize logging with an explicit filter that takes precedence over `RUST_LOG`
    pub fn init_with_filter(filter: Option<&str>) {
        INIT_LOGGER.call_once(|| {
            let mut builder = env_logger::Builder::from_default_env();
            if let Some(filter) = filter {
                builder.parse_filters(filter);
            }
            builder.format_timestamp_micros().init();

            debug!("Structured logging initialized");
        });
    }

    /// Initialize logging for test environments
    ///
    /// Use this in test modules to avoid initialization conflicts
    pub fn init_test() {
        let _ = env_logger::Builder::from_default_env()
            .is_test(true)
            .try_init();
    }

    /// Log a key set lifecycle event. Key ids are not secret and are logged as-is.
    pub fn log_key_event(operation: &str, kid: &str, success: bool) {
        if success {
            info!("Key set {operation} succeeded (kid: {kid})");
        } else {
            warn!("Key set {operation} failed (kid: {kid})");
        }
    }

    /// Log token issuance without exposing the subject
    ///
    /// The user identifier is hashed for privacy while maintaining traceability
    pub fn log_token_issued(kid: &str, uid: &str, counter: u64) {
        let uid_hash = Self::secure_hash(uid);
        info!("Token issued (kid: {kid}, uid_hash: {uid_hash}, counter: {counter})");
    }

    /// Log a rejected token with the verification stage that failed
    pub fn log_token_rejected(stage: &str, reason: &dyn std::error::Error) {
        warn!("Token rejected at {stage}: {reason}");
    }

    /// Cryptographically secure hashing for logging
    ///
    /// Returns the first 12 characters of the hex-encoded SHA-256 digest.
    pub fn secure_hash(value: &str) -> String {
        let digest = Sha256::digest(value.as_bytes());
        let hex_hash = hex::encode(digest);
        format!("#{}", &hex_hash[..12])
    }
}
