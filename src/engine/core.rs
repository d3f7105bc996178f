// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! This module contains a synchronous, deterministic "core runtime" that
//! consumes [`RuntimeEvent`]s and produces:
//! - an updated core state
//! - a list of "commands" describing what the IO shell should do next
//!
//! The async/IO-heavy shell (`engine::runtime::Runtime`) is responsible for:
//! - reading events from channels
//! - handing pipelines to the backend
//! - invoking the completion callback
//!
//! The core is intended to be extensively unit tested without any Tokio,
//! channels, filesystem, or processes.

use crate::engine::event_handlers::{
    handle_pipeline_finished, handle_pipeline_trigger, handle_startup_complete, CoreStep,
};
use crate::engine::pipeline_state::{PipelineState, RunState};
use crate::engine::{RuntimeEvent, RuntimeOptions};
use crate::types::ResourceKind;

/// Pure core runtime state.
///
/// It has **no** channels, no Tokio types, and does not perform any IO.
#[derive(Debug)]
pub struct CoreRuntime {
    state: PipelineState,
    options: RuntimeOptions,
}

impl CoreRuntime {
    pub fn new(options: RuntimeOptions) -> Self {
        Self {
            state: PipelineState::new(),
            options,
        }
    }

    /// True when neither pipeline is in flight.
    pub fn is_idle(&self) -> bool {
        self.state.all_idle()
    }

    pub fn run_state_of(&self, kind: ResourceKind) -> RunState {
        self.state.run_state_of(kind)
    }

    /// Handle a single runtime event, updating core state and returning the
    /// resulting commands for the IO shell.
    pub fn step(&mut self, event: RuntimeEvent) -> CoreStep {
        match event {
            RuntimeEvent::PipelineTriggered { kind, reason } => {
                handle_pipeline_trigger(&mut self.state, kind, reason)
            }
            RuntimeEvent::StartupComplete => handle_startup_complete(&mut self.state, &self.options),
            RuntimeEvent::PipelineFinished { kind, outcome } => {
                handle_pipeline_finished(&mut self.state, &self.options, kind, outcome)
            }
            RuntimeEvent::ShutdownRequested => CoreStep {
                commands: Vec::new(),
                keep_running: false,
            },
        }
    }
}
