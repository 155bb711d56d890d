//! Tracing subscriber setup

use reelflow_common::Config;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber
///
/// `RUST_LOG` wins over the configured filter. Fails if a subscriber is
/// already installed.
pub fn init_tracing(config: &Config) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.rust_log))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if config.log_json {
        builder.json().without_time().try_init()
    } else {
        builder.pretty().try_init()
    };

    result.map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))
}
