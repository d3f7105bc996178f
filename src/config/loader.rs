// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{BuildConfig, RawBuildConfig};
use crate::errors::Result;

/// Name of the config file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "Assetpipe.toml";

/// Load a configuration file from a given path and return the raw `RawBuildConfig`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawBuildConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let mut config: RawBuildConfig = toml::from_str(&contents)?;
    config.base_dir = Some(config_root_dir(path));

    Ok(config)
}

/// Load a configuration file from path and run basic validation.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Resolves relative source paths against the config file's directory.
/// - Resolves debug-dependent defaults (compile mode, pretty-print).
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<BuildConfig> {
    let raw_config = load_from_path(&path)?;
    let config = BuildConfig::try_from(raw_config)?;
    Ok(config)
}

/// Figure out the directory relative config paths are anchored at.
///
/// - If the config path has a non-empty parent (e.g. "web/Assetpipe.toml"),
///   we use that directory.
/// - If it's just a bare filename (parent = ""), we fall back to the current
///   working directory.
pub fn config_root_dir(config_path: &Path) -> PathBuf {
    let dir = match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };
    dir.canonicalize().unwrap_or(dir)
}
