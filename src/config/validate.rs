// src/config/validate.rs

use crate::config::model::{resolve_path, BuildConfig, RawBuildConfig, SourceRoots};
use crate::errors::{AssetpipeError, Result};
use crate::types::CompileMode;

impl TryFrom<RawBuildConfig> for BuildConfig {
    type Error = AssetpipeError;

    fn try_from(raw: RawBuildConfig) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;

        let base = raw.base_dir.as_deref();
        let resolve_all = |paths: &[String]| {
            paths
                .iter()
                .map(|p| resolve_path(base, p))
                .collect::<Vec<_>>()
        };

        let roots = SourceRoots {
            scripts: resolve_all(&raw.sources.scripts),
            externs: resolve_all(&raw.sources.externs),
            styles: resolve_all(&raw.sources.styles),
        };

        Ok(BuildConfig {
            output_dir: resolve_path(base, &raw.output_dir),
            output_dir_raw: raw.output_dir,
            name: raw.name,
            sources: raw.sources,
            roots,
            debug: raw.debug,
            compile_mode: raw
                .compile_mode
                .unwrap_or_else(|| CompileMode::default_for(raw.debug)),
            warning_level: raw.warning_level.unwrap_or_default(),
            pretty_print: raw.pretty_print.unwrap_or(raw.debug),
            hash: raw.hash,
            no_watch: raw.no_watch,
            source_map: raw.source_map,
            tools: raw.tools,
        })
    }
}

fn validate_raw_config(cfg: &RawBuildConfig) -> Result<()> {
    validate_name(cfg)?;
    validate_output_dir(cfg)?;
    validate_tools(cfg)?;
    Ok(())
}

fn validate_name(cfg: &RawBuildConfig) -> Result<()> {
    let name = cfg.name.trim();
    if name.is_empty() {
        return Err(AssetpipeError::ConfigError(
            "`name` must not be empty".to_string(),
        ));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(AssetpipeError::ConfigError(format!(
            "`name` must be a bare file name, got '{}'",
            cfg.name
        )));
    }
    Ok(())
}

fn validate_output_dir(cfg: &RawBuildConfig) -> Result<()> {
    if cfg.output_dir.trim().is_empty() {
        return Err(AssetpipeError::ConfigError(
            "`output_dir` must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_tools(cfg: &RawBuildConfig) -> Result<()> {
    let tools = [
        ("compiler", &cfg.tools.compiler),
        ("transpiler", &cfg.tools.transpiler),
        ("style_processor", &cfg.tools.style_processor),
    ];
    for (key, argv) in tools {
        let program_missing = argv.first().map(|p| p.trim().is_empty()).unwrap_or(true);
        if program_missing {
            return Err(AssetpipeError::ConfigError(format!(
                "[tools].{key} must name a program"
            )));
        }
    }
    Ok(())
}
