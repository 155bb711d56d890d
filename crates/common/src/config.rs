//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// Default trailing window for notification duplicate suppression
pub const DEFAULT_DEDUP_WINDOW_SECS: i64 = 300;

/// Longest accepted suppression window (one week)
pub const MAX_DEDUP_WINDOW_SECS: i64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Trailing window (seconds) in which identical notifications are suppressed
    pub dedup_window_secs: i64,

    /// Dispatch notifications on a spawned task instead of inline
    pub notifications_detached: bool,

    /// Prefix for generated invoice numbers
    pub invoice_number_prefix: String,

    /// Runtime configuration
    pub rust_log: String,

    /// Emit JSON log lines instead of human-readable ones
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dedup_window_secs: DEFAULT_DEDUP_WINDOW_SECS,
            notifications_detached: false,
            invoice_number_prefix: "INV-".to_string(),
            rust_log: "reelflow=debug".to_string(),
            log_json: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let defaults = Self::default();

        let dedup_window_secs = match env::var("NOTIFICATION_DEDUP_WINDOW_SECS") {
            Ok(raw) => raw.parse::<i64>().map_err(|_| {
                anyhow::anyhow!("NOTIFICATION_DEDUP_WINDOW_SECS must be an integer, got {raw}")
            })?,
            Err(_) => defaults.dedup_window_secs,
        };

        if dedup_window_secs <= 0 || dedup_window_secs > MAX_DEDUP_WINDOW_SECS {
            return Err(anyhow::anyhow!(
                "NOTIFICATION_DEDUP_WINDOW_SECS must be between 1 and {MAX_DEDUP_WINDOW_SECS}"
            ));
        }

        let config = Self {
            dedup_window_secs,
            notifications_detached: env::var("NOTIFICATIONS_DETACHED")
                .map(|v| v.parse().unwrap_or(false))
                .unwrap_or(defaults.notifications_detached),
            invoice_number_prefix: env::var("INVOICE_NUMBER_PREFIX")
                .unwrap_or(defaults.invoice_number_prefix),
            rust_log: env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            log_json: env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(defaults.log_json),
        };

        Ok(config)
    }
}
