// src/engine/mod.rs

//! Orchestration engine for assetpipe.
//!
//! This module ties together:
//! - the per-kind pipeline state (busy flags, pending re-runs, settle window)
//! - the main runtime event loop that reacts to:
//!   - startup staleness decisions
//!   - debounced file-watch triggers
//!   - pipeline completion events
//!   - shutdown signals
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use crate::types::ResourceKind;

/// Outcome of one pipeline run as reported to the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Every stage succeeded and the artifact(s) were put in place.
    Success,
    /// Discovery found nothing to build; no collaborator was invoked.
    Skipped,
    /// A stage reported a diagnostic or the artifact could not be committed.
    Failed,
}

/// Why a pipeline was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerReason {
    /// The staleness check at startup found the artifact out of date.
    Startup,
    /// The watcher saw settled source changes of this kind.
    FileWatch,
}

/// Runtime options used by both the core and the async shell.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeOptions {
    /// If true, exit the runtime after the first settle (no watcher).
    pub exit_when_idle: bool,
}

/// Events flowing into the runtime from startup, the watcher and pipelines.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// Run the pipeline for `kind`.
    PipelineTriggered {
        kind: ResourceKind,
        reason: TriggerReason,
    },
    /// Both startup decisions have been issued.
    StartupComplete,
    /// A pipeline run ended, successfully or not.
    PipelineFinished {
        kind: ResourceKind,
        outcome: PipelineOutcome,
    },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

/// Called every time all started pipelines have settled.
pub type SettledCallback = Box<dyn FnMut() + Send + 'static>;

pub mod core;
pub mod event_handlers;
pub mod pipeline_state;
pub mod runtime;

pub use self::core::CoreRuntime;
pub use event_handlers::{CoreCommand, CoreStep};
pub use pipeline_state::{PipelineState, RunState};
pub use runtime::Runtime;
