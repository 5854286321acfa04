//! Telemetry initialisation for the `tokenseal` CLI.
//!
//! Structured JSON logs only, written to stderr so stdout carries nothing but
//! command output.
//!
//! # Telemetry invariants
//!
//! - **No plaintext or key material** in any log field.
//! - `RUST_LOG` wins over `--log-level` when set.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Initialise the tracing subscriber at `log_level`.
///
/// # Errors
///
/// Returns an error if the subscriber has already been set.
pub fn init(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .json()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise tokenseal tracing subscriber: {e}"))
}
