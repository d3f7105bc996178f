// tests/logging.rs

use tracing_subscriber::filter::LevelFilter;

use assetpipe::cli::LogLevel;
use assetpipe::logging::{build_filter, LOG_ENV_VAR};

#[test]
fn cli_level_wins_over_the_environment() {
    let filter = build_filter(Some(LogLevel::Warn), Some("trace"));
    assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
}

#[test]
fn env_directives_are_used_without_a_cli_level() {
    let filter = build_filter(None, Some("assetpipe::watch=debug"));
    assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
}

#[test]
fn blank_or_missing_env_defaults_to_info() {
    assert_eq!(build_filter(None, None).max_level_hint(), Some(LevelFilter::INFO));
    assert_eq!(build_filter(None, Some("  ")).max_level_hint(), Some(LevelFilter::INFO));
}

#[test]
fn env_var_name_is_stable() {
    assert_eq!(LOG_ENV_VAR, "ASSETPIPE_LOG");
}
