// src/config/model.rs

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::types::{CompileMode, ResourceKind, WarningLevel};

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// name = "app"
/// output_dir = "build"
/// hash = true
///
/// [sources]
/// scripts = ["src/js", "src/templates"]
/// externs = ["externs"]
/// styles = ["src/less"]
///
/// [tools]
/// compiler = ["closure-compiler"]
/// ```
///
/// All keys are optional and have reasonable defaults. This is the raw,
/// unvalidated form; convert it with `BuildConfig::try_from`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBuildConfig {
    /// Base name of every artifact (`<name>.js`, `<name>.css`).
    #[serde(default = "default_name")]
    pub name: String,

    /// Directory the artifacts are written into.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Cheaper compile mode and pretty-printed output unless overridden.
    #[serde(default)]
    pub debug: bool,

    /// Append a configuration fingerprint to artifact names.
    #[serde(default)]
    pub hash: bool,

    /// Build once and exit instead of watching sources.
    #[serde(default)]
    pub no_watch: bool,

    /// Also produce `<name>.css.map`.
    #[serde(default)]
    pub source_map: bool,

    #[serde(default)]
    pub compile_mode: Option<CompileMode>,

    #[serde(default)]
    pub warning_level: Option<WarningLevel>,

    #[serde(default)]
    pub pretty_print: Option<bool>,

    #[serde(default)]
    pub sources: SourcesSection,

    #[serde(default)]
    pub tools: ToolsSection,

    /// Directory relative source paths are resolved against. Set by the
    /// loader to the config file's directory; `None` keeps them as written.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

fn default_name() -> String {
    "app".to_string()
}

fn default_output_dir() -> String {
    "build".to_string()
}

impl Default for RawBuildConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            output_dir: default_output_dir(),
            debug: false,
            hash: false,
            no_watch: false,
            source_map: false,
            compile_mode: None,
            warning_level: None,
            pretty_print: None,
            sources: SourcesSection::default(),
            tools: ToolsSection::default(),
            base_dir: None,
        }
    }
}

/// `[sources]` section. Order matters: it is preserved into the output.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SourcesSection {
    /// Script and template roots.
    #[serde(default)]
    pub scripts: Vec<String>,

    /// Extern declaration roots, passed to the compiler separately.
    #[serde(default)]
    pub externs: Vec<String>,

    /// Stylesheet roots (stylesheets and their includes).
    #[serde(default)]
    pub styles: Vec<String>,
}

/// `[tools]` section: argv prefix of each external collaborator.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolsSection {
    #[serde(default = "default_compiler")]
    pub compiler: Vec<String>,

    #[serde(default = "default_transpiler")]
    pub transpiler: Vec<String>,

    #[serde(default = "default_style_processor")]
    pub style_processor: Vec<String>,
}

fn default_compiler() -> Vec<String> {
    vec!["closure-compiler".to_string()]
}

fn default_transpiler() -> Vec<String> {
    vec!["soy2js".to_string()]
}

fn default_style_processor() -> Vec<String> {
    vec!["lessc".to_string()]
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self {
            compiler: default_compiler(),
            transpiler: default_transpiler(),
            style_processor: default_style_processor(),
        }
    }
}

/// Resolved source roots, in configured order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRoots {
    pub scripts: Vec<PathBuf>,
    pub externs: Vec<PathBuf>,
    pub styles: Vec<PathBuf>,
}

/// Validated, read-only build configuration.
///
/// Construct through `BuildConfig::try_from(raw)`; the effective compile
/// mode, warning level and pretty-print flag are already resolved here.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub name: String,
    /// Output directory as written in the config (fingerprint input).
    pub output_dir_raw: String,
    pub output_dir: PathBuf,
    /// Source lists as written in the config (fingerprint input).
    pub sources: SourcesSection,
    pub roots: SourceRoots,
    pub debug: bool,
    pub compile_mode: CompileMode,
    pub warning_level: WarningLevel,
    pub pretty_print: bool,
    pub hash: bool,
    pub no_watch: bool,
    pub source_map: bool,
    pub tools: ToolsSection,
}

impl BuildConfig {
    /// Roots the staleness check for `kind` looks at.
    ///
    /// Extern changes invalidate the script artifact as well.
    pub fn staleness_roots(&self, kind: ResourceKind) -> Vec<PathBuf> {
        match kind {
            ResourceKind::Script => self
                .roots
                .scripts
                .iter()
                .chain(self.roots.externs.iter())
                .cloned()
                .collect(),
            ResourceKind::Style => self.roots.styles.clone(),
        }
    }
}

/// Join `path` onto `base` unless it is already absolute.
pub(crate) fn resolve_path(base: Option<&Path>, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    match base {
        Some(base) if path.is_relative() => base.join(path),
        _ => path,
    }
}
