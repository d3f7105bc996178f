// tests/config_loading.rs

mod common;
use crate::common::write_file;

use std::error::Error;

use tempfile::tempdir;

use assetpipe::config::{load_and_validate, load_from_path, BuildConfig};
use assetpipe::errors::AssetpipeError;
use assetpipe::types::{CompileMode, WarningLevel};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn full_config_is_loaded_and_paths_are_resolved() -> TestResult {
    let dir = tempdir()?;
    write_file(
        dir.path(),
        "Assetpipe.toml",
        r#"
name = "site"
output_dir = "public/assets"
hash = true
source_map = true
warning_level = "verbose"

[sources]
scripts = ["js", "templates"]
externs = ["/opt/externs"]
styles = ["less"]

[tools]
compiler = ["java", "-jar", "compiler.jar"]
"#,
    );

    let cfg = load_and_validate(dir.path().join("Assetpipe.toml"))?;
    let base = dir.path().canonicalize()?;

    assert_eq!(cfg.name, "site");
    assert_eq!(cfg.output_dir_raw, "public/assets");
    assert_eq!(cfg.output_dir, base.join("public/assets"));
    assert_eq!(cfg.roots.scripts, vec![base.join("js"), base.join("templates")]);
    assert_eq!(cfg.roots.externs, vec![std::path::PathBuf::from("/opt/externs")]);
    assert_eq!(cfg.roots.styles, vec![base.join("less")]);
    assert!(cfg.hash);
    assert!(cfg.source_map);
    assert_eq!(cfg.warning_level, WarningLevel::Verbose);
    assert_eq!(cfg.tools.compiler, vec!["java", "-jar", "compiler.jar"]);
    assert_eq!(cfg.tools.style_processor, vec!["lessc"]);
    Ok(())
}

#[test]
fn empty_config_uses_defaults() -> TestResult {
    let dir = tempdir()?;
    write_file(dir.path(), "Assetpipe.toml", "");

    let cfg = load_and_validate(dir.path().join("Assetpipe.toml"))?;

    assert_eq!(cfg.name, "app");
    assert_eq!(cfg.output_dir_raw, "build");
    assert_eq!(cfg.compile_mode, CompileMode::Simple);
    assert_eq!(cfg.warning_level, WarningLevel::Default);
    assert!(!cfg.pretty_print);
    assert!(!cfg.hash && !cfg.no_watch && !cfg.source_map);
    assert!(cfg.roots.scripts.is_empty());
    Ok(())
}

#[test]
fn debug_selects_cheaper_mode_and_pretty_print_unless_overridden() -> TestResult {
    let dir = tempdir()?;
    write_file(dir.path(), "debug.toml", "debug = true\n");
    write_file(
        dir.path(),
        "override.toml",
        "debug = true\ncompile_mode = \"advanced\"\npretty_print = false\n",
    );

    let debug = load_and_validate(dir.path().join("debug.toml"))?;
    assert_eq!(debug.compile_mode, CompileMode::Whitespace);
    assert!(debug.pretty_print);

    let overridden = load_and_validate(dir.path().join("override.toml"))?;
    assert_eq!(overridden.compile_mode, CompileMode::Advanced);
    assert!(!overridden.pretty_print);
    Ok(())
}

#[test]
fn raw_load_keeps_values_as_written() -> TestResult {
    let dir = tempdir()?;
    write_file(dir.path(), "Assetpipe.toml", "[sources]\nstyles = [\"less\"]\n");

    let raw = load_from_path(dir.path().join("Assetpipe.toml"))?;

    assert_eq!(raw.sources.styles, vec!["less"]);
    assert_eq!(raw.base_dir, Some(dir.path().canonicalize()?));
    Ok(())
}

fn expect_config_error(toml: &str) -> String {
    let dir = tempdir().expect("tempdir");
    write_file(dir.path(), "Assetpipe.toml", toml);
    match load_and_validate(dir.path().join("Assetpipe.toml")) {
        Err(AssetpipeError::ConfigError(msg)) => msg,
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn empty_name_is_rejected() {
    let msg = expect_config_error("name = \"  \"\n");
    assert!(msg.contains("name"), "{msg}");
}

#[test]
fn name_with_path_separator_is_rejected() {
    let msg = expect_config_error("name = \"nested/app\"\n");
    assert!(msg.contains("bare file name"), "{msg}");
}

#[test]
fn empty_output_dir_is_rejected() {
    let msg = expect_config_error("output_dir = \"\"\n");
    assert!(msg.contains("output_dir"), "{msg}");
}

#[test]
fn empty_tool_command_is_rejected() {
    let msg = expect_config_error("[tools]\ntranspiler = []\n");
    assert!(msg.contains("transpiler"), "{msg}");
}

#[test]
fn malformed_toml_is_a_toml_error() -> TestResult {
    let dir = tempdir()?;
    write_file(dir.path(), "Assetpipe.toml", "name = \n");

    let err = load_and_validate(dir.path().join("Assetpipe.toml")).unwrap_err();
    assert!(matches!(err, AssetpipeError::TomlError(_)), "{err:?}");
    Ok(())
}

#[test]
fn unknown_compile_mode_is_a_toml_error() -> TestResult {
    let dir = tempdir()?;
    write_file(dir.path(), "Assetpipe.toml", "compile_mode = \"turbo\"\n");

    let err = load_and_validate(dir.path().join("Assetpipe.toml")).unwrap_err();
    assert!(matches!(err, AssetpipeError::TomlError(_)), "{err:?}");
    Ok(())
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempdir().expect("tempdir");
    let err = load_and_validate(dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, AssetpipeError::IoError(_)), "{err:?}");
}

#[test]
fn config_without_base_dir_keeps_paths_as_written() {
    let raw = assetpipe::config::RawBuildConfig::default();
    let cfg = BuildConfig::try_from(raw).expect("default config is valid");
    assert_eq!(cfg.output_dir, std::path::PathBuf::from("build"));
}
