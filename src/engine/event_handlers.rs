// src/engine/event_handlers.rs

//! Event handling logic for the core runtime.

use tracing::{debug, info, warn};

use crate::engine::pipeline_state::PipelineState;
use crate::engine::{PipelineOutcome, RuntimeOptions, TriggerReason};
use crate::types::ResourceKind;

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Hand this pipeline to the backend.
    RunPipeline {
        kind: ResourceKind,
        reason: TriggerReason,
    },
    /// Every started pipeline has finished; invoke the completion callback.
    Settled,
    /// Request that the process exits (used for `--once` after settling).
    RequestExit,
}

/// Decision returned by the core after handling a single `RuntimeEvent`.
#[derive(Debug, Clone)]
pub struct CoreStep {
    /// Commands the IO shell should execute, in order.
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    fn running(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }
}

/// Handle a pipeline trigger.
///
/// - Idle kind: start it.
/// - Running kind: remember one re-run for when the current run finishes.
pub fn handle_pipeline_trigger(
    state: &mut PipelineState,
    kind: ResourceKind,
    reason: TriggerReason,
) -> CoreStep {
    let mut commands = Vec::new();

    if state.try_start(kind) {
        info!(%kind, ?reason, "starting pipeline");
        commands.push(CoreCommand::RunPipeline { kind, reason });
    } else {
        debug!(%kind, ?reason, "pipeline busy; re-run queued");
    }

    CoreStep::running(commands)
}

/// Handle the end of startup: both kinds have had their staleness decision.
pub fn handle_startup_complete(state: &mut PipelineState, options: &RuntimeOptions) -> CoreStep {
    state.complete_startup();

    let mut commands = Vec::new();
    let settled = state.try_settle(true);
    if settled {
        info!("startup settled; no pipeline in flight");
        commands.push(CoreCommand::Settled);
    }

    finish_step(commands, settled, options)
}

/// Handle a pipeline completion.
pub fn handle_pipeline_finished(
    state: &mut PipelineState,
    options: &RuntimeOptions,
    kind: ResourceKind,
    outcome: PipelineOutcome,
) -> CoreStep {
    let mut commands = Vec::new();

    if !state.finish(kind) {
        warn!(%kind, ?outcome, "completion for a pipeline that was not running; ignoring");
        return CoreStep::running(commands);
    }

    match outcome {
        PipelineOutcome::Success => info!(%kind, "pipeline finished"),
        PipelineOutcome::Skipped => info!(%kind, "pipeline had nothing to build"),
        PipelineOutcome::Failed => warn!(%kind, "pipeline failed; waiting for the next change"),
    }

    if state.take_rerun(kind) {
        let mut step = handle_pipeline_trigger(state, kind, TriggerReason::FileWatch);
        commands.append(&mut step.commands);
        return CoreStep::running(commands);
    }

    let settled = state.try_settle(false);
    if settled {
        info!("all pipelines settled");
        commands.push(CoreCommand::Settled);
    }

    finish_step(commands, settled, options)
}

/// In `--once` mode we can exit as soon as a window settles.
fn finish_step(
    mut commands: Vec<CoreCommand>,
    settled: bool,
    options: &RuntimeOptions,
) -> CoreStep {
    let mut keep_running = true;
    if settled && options.exit_when_idle {
        keep_running = false;
        commands.push(CoreCommand::RequestExit);
    }
    CoreStep {
        commands,
        keep_running,
    }
}
