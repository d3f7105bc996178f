// src/pipeline/collaborator.rs

//! External collaborator abstraction.
//!
//! A collaborator is an opaque unit of work (template transpiler, script
//! compiler, stylesheet processor) that takes an ordered list of inputs plus
//! option tokens and either writes its output file or reports a diagnostic.
//! Production code uses [`super::command::CommandCollaborator`]; tests plug
//! in fakes.

use std::ffi::OsString;
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use crate::config::BuildConfig;
use crate::pipeline::command::CommandCollaborator;
use crate::types::{CompileMode, WarningLevel};

/// Which stage a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Templates → intermediate script.
    Transpile,
    /// Scripts (+ transpiled templates) → script artifact.
    Compile,
    /// Stylesheets → style artifact (+ source map).
    StyleProcess,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Transpile => "transpile",
            Stage::Compile => "compile",
            Stage::StyleProcess => "style-process",
        })
    }
}

/// One invocation of a collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageRequest {
    pub stage: Stage,
    /// Absolute input paths, in build order.
    pub inputs: Vec<PathBuf>,
    /// Extern declarations (compile stage only).
    pub externs: Vec<PathBuf>,
    /// Where the collaborator must write its output.
    pub output: PathBuf,
    pub source_map: Option<PathBuf>,
    pub compile_mode: CompileMode,
    pub warning_level: WarningLevel,
    pub pretty_print: bool,
}

impl StageRequest {
    /// Command-line arguments appended to the tool's argv prefix.
    ///
    /// `--mode M --warnings W [--pretty] --output O [--source-map S]
    /// [--extern E]... -- INPUTS...`
    pub fn to_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--mode".into(),
            self.compile_mode.token().into(),
            "--warnings".into(),
            self.warning_level.token().into(),
        ];
        if self.pretty_print {
            args.push("--pretty".into());
        }
        args.push("--output".into());
        args.push(self.output.clone().into());
        if let Some(map) = &self.source_map {
            args.push("--source-map".into());
            args.push(map.clone().into());
        }
        for ext in &self.externs {
            args.push("--extern".into());
            args.push(ext.clone().into());
        }
        args.push("--".into());
        args.extend(self.inputs.iter().map(|p| p.clone().into_os_string()));
        args
    }
}

/// Result of one collaborator invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Success,
    /// The collaborator's full diagnostic output, source excerpts included.
    Failed { diagnostic: String },
}

/// Trait abstracting one external tool.
pub trait Collaborator: Send + Sync {
    fn invoke(
        &self,
        request: StageRequest,
    ) -> Pin<Box<dyn Future<Output = StageOutcome> + Send + '_>>;
}

/// The three collaborators a build needs.
#[derive(Clone)]
pub struct Collaborators {
    pub transpiler: Arc<dyn Collaborator>,
    pub compiler: Arc<dyn Collaborator>,
    pub style_processor: Arc<dyn Collaborator>,
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

impl Collaborators {
    /// External commands configured in `[tools]`.
    pub fn from_config(cfg: &BuildConfig) -> Self {
        Self {
            transpiler: Arc::new(CommandCollaborator::new(cfg.tools.transpiler.clone())),
            compiler: Arc::new(CommandCollaborator::new(cfg.tools.compiler.clone())),
            style_processor: Arc::new(CommandCollaborator::new(cfg.tools.style_processor.clone())),
        }
    }

    pub fn for_stage(&self, stage: Stage) -> &Arc<dyn Collaborator> {
        match stage {
            Stage::Transpile => &self.transpiler,
            Stage::Compile => &self.compiler,
            Stage::StyleProcess => &self.style_processor,
        }
    }
}
