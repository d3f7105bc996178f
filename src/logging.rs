// src/logging.rs

//! Process-wide `tracing` subscriber for the `assetpipe` binary.
//!
//! The filter is chosen once at startup:
//! - `--log-level LEVEL` applies `LEVEL` to every target;
//! - otherwise `ASSETPIPE_LOG` is read as a full `EnvFilter` directive list,
//!   so `ASSETPIPE_LOG=assetpipe::watch=debug,info` works;
//! - otherwise everything at `info` and above is shown.
//!
//! Output goes to stderr; stdout is reserved for `--print-names` and
//! `--dry-run` output.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

use crate::cli::LogLevel;

/// Environment variable consulted when no `--log-level` is given.
pub const LOG_ENV_VAR: &str = "ASSETPIPE_LOG";

const DEFAULT_DIRECTIVE: &str = "info";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV_VAR).ok();
    let filter = build_filter(cli_level, env.as_deref());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow!("cannot install log subscriber: {e}"))
}

/// Resolve the effective filter from the CLI flag and the env var value.
///
/// An env value that is blank or does not parse falls back to `info`.
pub fn build_filter(cli_level: Option<LogLevel>, env: Option<&str>) -> EnvFilter {
    if let Some(level) = cli_level {
        return EnvFilter::new(level_directive(level));
    }

    env.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

fn level_directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
