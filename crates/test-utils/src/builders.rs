use std::path::Path;

use assetpipe::config::{BuildConfig, RawBuildConfig};
use assetpipe::types::{CompileMode, WarningLevel};

/// Builder for `BuildConfig` to simplify test setup.
///
/// Relative source paths are resolved against `base_dir` when one is set,
/// exactly as the loader does for a config file's directory.
pub struct BuildConfigBuilder {
    config: RawBuildConfig,
}

impl BuildConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RawBuildConfig::default(),
        }
    }

    pub fn base_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.base_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.config.name = name.to_string();
        self
    }

    pub fn output_dir(mut self, dir: &str) -> Self {
        self.config.output_dir = dir.to_string();
        self
    }

    pub fn script_root(mut self, root: &str) -> Self {
        self.config.sources.scripts.push(root.to_string());
        self
    }

    pub fn extern_root(mut self, root: &str) -> Self {
        self.config.sources.externs.push(root.to_string());
        self
    }

    pub fn style_root(mut self, root: &str) -> Self {
        self.config.sources.styles.push(root.to_string());
        self
    }

    pub fn debug(mut self, val: bool) -> Self {
        self.config.debug = val;
        self
    }

    pub fn hash(mut self, val: bool) -> Self {
        self.config.hash = val;
        self
    }

    pub fn no_watch(mut self, val: bool) -> Self {
        self.config.no_watch = val;
        self
    }

    pub fn source_map(mut self, val: bool) -> Self {
        self.config.source_map = val;
        self
    }

    pub fn compile_mode(mut self, mode: CompileMode) -> Self {
        self.config.compile_mode = Some(mode);
        self
    }

    pub fn warning_level(mut self, level: WarningLevel) -> Self {
        self.config.warning_level = Some(level);
        self
    }

    pub fn pretty_print(mut self, val: bool) -> Self {
        self.config.pretty_print = Some(val);
        self
    }

    pub fn raw(&self) -> &RawBuildConfig {
        &self.config
    }

    pub fn build(self) -> BuildConfig {
        BuildConfig::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for BuildConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
