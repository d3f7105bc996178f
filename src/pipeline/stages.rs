// src/pipeline/stages.rs

//! Stage sequences of the two pipelines.
//!
//! Script: (transpile templates →) compile. Style: process. Each stage is one
//! awaited collaborator call; stages of one pipeline run strictly in order.
//! Collaborators write into `<artifact>.partial` and the result is renamed
//! into place only on success, so a failed run leaves the previous artifact
//! untouched.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::config::BuildConfig;
use crate::engine::PipelineOutcome;
use crate::fingerprint::ArtifactNames;
use crate::fs::FileSystem;
use crate::scan::{scan_sources, ExtensionPattern};
use crate::types::ResourceKind;

use super::collaborator::{Collaborators, Stage, StageOutcome, StageRequest};

/// Suffix of the staging file a collaborator writes into.
pub const STAGING_SUFFIX: &str = "partial";

/// Everything a pipeline run needs. Cheap to clone.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    pub config: Arc<BuildConfig>,
    pub artifacts: ArtifactNames,
    pub fs: Arc<dyn FileSystem>,
    pub collaborators: Collaborators,
}

/// Inputs of the script pipeline, each list in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptInputs {
    pub scripts: Vec<PathBuf>,
    pub templates: Vec<PathBuf>,
    pub externs: Vec<PathBuf>,
}

impl ScriptInputs {
    pub fn discover(fs: &dyn FileSystem, cfg: &BuildConfig) -> Self {
        Self {
            scripts: scan_sources(fs, &cfg.roots.scripts, &ExtensionPattern::scripts()),
            templates: scan_sources(fs, &cfg.roots.scripts, &ExtensionPattern::templates()),
            externs: scan_sources(fs, &cfg.roots.externs, &ExtensionPattern::scripts()),
        }
    }
}

/// Stylesheets (includes too) in discovery order.
pub fn discover_styles(fs: &dyn FileSystem, cfg: &BuildConfig) -> Vec<PathBuf> {
    scan_sources(fs, &cfg.roots.styles, &ExtensionPattern::styles())
}

/// `<artifact>.partial`
pub fn staging_path(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_os_string();
    name.push(".");
    name.push(STAGING_SUFFIX);
    PathBuf::from(name)
}

/// Path of the transpiled-template intermediate.
pub fn intermediate_templates_path(ctx: &PipelineContext) -> PathBuf {
    ctx.artifacts
        .output_dir()
        .join(format!("{}.templates.js", ctx.config.name))
}

impl PipelineContext {
    fn request(
        &self,
        stage: Stage,
        inputs: Vec<PathBuf>,
        externs: Vec<PathBuf>,
        output: PathBuf,
        source_map: Option<PathBuf>,
    ) -> StageRequest {
        StageRequest {
            stage,
            inputs,
            externs,
            output,
            source_map,
            compile_mode: self.config.compile_mode,
            warning_level: self.config.warning_level,
            pretty_print: self.config.pretty_print,
        }
    }

    async fn invoke(&self, kind: ResourceKind, request: StageRequest) -> StageOutcome {
        let stage = request.stage;
        let collaborator = Arc::clone(self.collaborators.for_stage(stage));
        let outcome = collaborator.invoke(request).await;
        if let StageOutcome::Failed { diagnostic } = &outcome {
            error!(%kind, %stage, "collaborator failed:\n{}", diagnostic);
        }
        outcome
    }

    fn ensure_output_dir(&self) -> bool {
        let dir = self.artifacts.output_dir();
        match self.fs.create_dir_all(dir) {
            Ok(()) => true,
            Err(err) => {
                error!(?dir, error = %err, "cannot create output directory");
                false
            }
        }
    }

    /// Move staged outputs into place. `required` staging files must exist.
    fn commit(&self, kind: ResourceKind, staged: &[(PathBuf, PathBuf, bool)]) -> PipelineOutcome {
        let mut outcome = PipelineOutcome::Success;
        for (from, to, required) in staged {
            if !self.fs.exists(from) {
                if *required {
                    error!(%kind, staged = ?from, "collaborator reported success but wrote no output");
                    outcome = PipelineOutcome::Failed;
                } else {
                    warn!(%kind, staged = ?from, "optional output was not produced");
                }
                continue;
            }
            match self.fs.rename(from, to) {
                Ok(()) => info!(%kind, artifact = ?to, "artifact written"),
                Err(err) => {
                    error!(%kind, artifact = ?to, error = %err, "cannot move artifact into place");
                    outcome = PipelineOutcome::Failed;
                }
            }
        }
        outcome
    }

    /// Remove staging files left behind by a failed stage.
    fn discard(&self, staged: &[PathBuf]) {
        for path in staged {
            if self.fs.exists(path) {
                if let Err(err) = self.fs.remove_file(path) {
                    debug!(?path, error = %err, "cannot remove staging file");
                }
            }
        }
    }
}

/// Run the pipeline for `kind` to completion.
pub async fn run_pipeline(ctx: &PipelineContext, kind: ResourceKind) -> PipelineOutcome {
    match kind {
        ResourceKind::Script => run_script_pipeline(ctx).await,
        ResourceKind::Style => run_style_pipeline(ctx).await,
    }
}

async fn run_script_pipeline(ctx: &PipelineContext) -> PipelineOutcome {
    let kind = ResourceKind::Script;
    let inputs = {
        let fs = Arc::clone(&ctx.fs);
        let cfg = Arc::clone(&ctx.config);
        match tokio::task::spawn_blocking(move || ScriptInputs::discover(&*fs, &cfg)).await {
            Ok(inputs) => inputs,
            Err(err) => {
                error!(%kind, error = %err, "source discovery panicked");
                return PipelineOutcome::Failed;
            }
        }
    };

    if inputs.scripts.is_empty() && inputs.templates.is_empty() {
        warn!(%kind, "no script or template sources found");
        return PipelineOutcome::Skipped;
    }
    if !ctx.ensure_output_dir() {
        return PipelineOutcome::Failed;
    }

    let ScriptInputs {
        scripts: mut compile_inputs,
        templates,
        externs,
    } = inputs;

    if !templates.is_empty() {
        let intermediate = intermediate_templates_path(ctx);
        debug!(%kind, templates = templates.len(), "transpiling templates");
        let request = ctx.request(Stage::Transpile, templates, Vec::new(), intermediate.clone(), None);
        if let StageOutcome::Failed { .. } = ctx.invoke(kind, request).await {
            return PipelineOutcome::Failed;
        }
        compile_inputs.push(intermediate);
    }

    let target = ctx.artifacts.script_path();
    let staged = staging_path(&target);
    let request = ctx.request(Stage::Compile, compile_inputs, externs, staged.clone(), None);

    match ctx.invoke(kind, request).await {
        StageOutcome::Success => ctx.commit(kind, &[(staged, target, true)]),
        StageOutcome::Failed { .. } => {
            ctx.discard(&[staged]);
            PipelineOutcome::Failed
        }
    }
}

async fn run_style_pipeline(ctx: &PipelineContext) -> PipelineOutcome {
    let kind = ResourceKind::Style;
    let inputs = {
        let fs = Arc::clone(&ctx.fs);
        let cfg = Arc::clone(&ctx.config);
        match tokio::task::spawn_blocking(move || discover_styles(&*fs, &cfg)).await {
            Ok(inputs) => inputs,
            Err(err) => {
                error!(%kind, error = %err, "source discovery panicked");
                return PipelineOutcome::Failed;
            }
        }
    };

    if inputs.is_empty() {
        warn!(%kind, "no stylesheet sources found");
        return PipelineOutcome::Skipped;
    }
    if !ctx.ensure_output_dir() {
        return PipelineOutcome::Failed;
    }

    let css_target = ctx.artifacts.style_path();
    let css_staged = staging_path(&css_target);
    let map = ctx.config.source_map.then(|| {
        let target = ctx.artifacts.source_map_path();
        (staging_path(&target), target)
    });

    let request = ctx.request(
        Stage::StyleProcess,
        inputs,
        Vec::new(),
        css_staged.clone(),
        map.as_ref().map(|(staged, _)| staged.clone()),
    );

    let mut staged = vec![(css_staged, css_target, true)];
    if let Some((map_staged, map_target)) = map {
        staged.push((map_staged, map_target, false));
    }

    match ctx.invoke(kind, request).await {
        StageOutcome::Success => ctx.commit(kind, &staged),
        StageOutcome::Failed { .. } => {
            let paths: Vec<PathBuf> = staged.into_iter().map(|(from, _, _)| from).collect();
            ctx.discard(&paths);
            PipelineOutcome::Failed
        }
    }
}
