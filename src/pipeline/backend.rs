// src/pipeline/backend.rs

//! Pluggable pipeline backend abstraction.
//!
//! The runtime talks to a `PipelineBackend` instead of running stages
//! itself. This makes it easy to swap in a fake backend in tests while
//! keeping the production stage sequences in [`super::stages`].
//!
//! - `RealPipelineBackend` spawns each run as its own Tokio task and reports
//!   `RuntimeEvent::PipelineFinished` when the run ends.
//! - Tests can provide their own `PipelineBackend` that, for example, records
//!   which kinds were dispatched and directly emits completion events.

use std::future::Future;
use std::pin::Pin;

use tokio::sync::mpsc;
use tracing::debug;

use crate::engine::{RuntimeEvent, TriggerReason};
use crate::errors::Result;
use crate::types::ResourceKind;

use super::stages::{run_pipeline, PipelineContext};

/// Trait abstracting how pipelines are executed.
pub trait PipelineBackend: Send {
    /// Start the pipeline for `kind`. Must not wait for it to finish; the
    /// end of the run is reported as a `RuntimeEvent::PipelineFinished`.
    fn spawn_pipeline(
        &mut self,
        kind: ResourceKind,
        reason: TriggerReason,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Real backend used in production.
pub struct RealPipelineBackend {
    ctx: PipelineContext,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
}

impl RealPipelineBackend {
    pub fn new(ctx: PipelineContext, runtime_tx: mpsc::Sender<RuntimeEvent>) -> Self {
        Self { ctx, runtime_tx }
    }
}

impl PipelineBackend for RealPipelineBackend {
    fn spawn_pipeline(
        &mut self,
        kind: ResourceKind,
        reason: TriggerReason,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let ctx = self.ctx.clone();
        let tx = self.runtime_tx.clone();

        Box::pin(async move {
            tokio::spawn(async move {
                debug!(%kind, ?reason, "pipeline task started");
                let outcome = run_pipeline(&ctx, kind).await;

                // Collaborator calls cannot be cancelled; if the runtime was
                // torn down meanwhile, the completion has nowhere to go.
                if tx
                    .send(RuntimeEvent::PipelineFinished { kind, outcome })
                    .await
                    .is_err()
                {
                    debug!(%kind, ?outcome, "runtime gone; dropping pipeline completion");
                }
            });
            Ok(())
        })
    }
}
