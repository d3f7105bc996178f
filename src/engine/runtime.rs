// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::errors::Result;
use crate::pipeline::PipelineBackend;

use super::core::CoreRuntime;
use super::{CoreCommand, RuntimeEvent, SettledCallback};

/// Drives the core in response to `RuntimeEvent`s, and delegates pipeline
/// execution to a `PipelineBackend`.
///
/// This is a pure IO shell around `CoreRuntime`, which contains all the
/// runtime semantics. This struct handles async IO: reading events from
/// channels, dispatching pipelines and calling the completion callback.
pub struct Runtime<B: PipelineBackend> {
    core: CoreRuntime,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    backend: B,
    on_settled: Option<SettledCallback>,
}

impl<B: PipelineBackend> fmt::Debug for Runtime<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .field("on_settled", &self.on_settled.is_some())
            .finish_non_exhaustive()
    }
}

impl<B: PipelineBackend> Runtime<B> {
    pub fn new(core: CoreRuntime, event_rx: mpsc::Receiver<RuntimeEvent>, backend: B) -> Self {
        Self {
            core,
            event_rx,
            backend,
            on_settled: None,
        }
    }

    /// Install the callback fired every time all started pipelines settle.
    pub fn with_on_settled(mut self, on_settled: Option<SettledCallback>) -> Self {
        self.on_settled = on_settled;
        self
    }

    /// Main event loop.
    ///
    /// - Consumes `RuntimeEvent`s from `event_rx`.
    /// - Feeds them into the core runtime.
    /// - Executes commands returned by the core.
    ///
    /// Returning drops the receiver, so completions from pipelines still in
    /// flight are discarded by their senders.
    pub async fn run(mut self) -> Result<()> {
        info!("assetpipe runtime started");

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "runtime received event");

            let step = self.core.step(event);

            for command in step.commands {
                self.execute_command(command).await?;
            }

            if !step.keep_running {
                info!("core requested exit; stopping runtime");
                break;
            }
        }

        info!("runtime exiting");
        Ok(())
    }

    /// Execute a single command from the core.
    async fn execute_command(&mut self, command: CoreCommand) -> Result<()> {
        match command {
            CoreCommand::RunPipeline { kind, reason } => {
                debug!(%kind, ?reason, "dispatching pipeline");
                self.backend.spawn_pipeline(kind, reason).await?;
            }
            CoreCommand::Settled => {
                if let Some(callback) = self.on_settled.as_mut() {
                    debug!("invoking completion callback");
                    callback();
                }
            }
            CoreCommand::RequestExit => {
                // keep_running=false already ends the loop; this is informational.
                info!("core issued RequestExit command");
            }
        }
        Ok(())
    }
}
