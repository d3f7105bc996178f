use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use assetpipe::engine::{PipelineOutcome, RuntimeEvent, TriggerReason};
use assetpipe::errors::Result;
use assetpipe::pipeline::PipelineBackend;
use assetpipe::types::ResourceKind;

/// A fake backend that:
/// - records which kinds were dispatched (and why)
/// - immediately reports `PipelineFinished(Success)` for each one.
pub struct FakeBackend {
    runtime_tx: tokio::sync::mpsc::Sender<RuntimeEvent>,
    dispatched: Arc<Mutex<Vec<(ResourceKind, TriggerReason)>>>,
}

impl FakeBackend {
    pub fn new(
        runtime_tx: tokio::sync::mpsc::Sender<RuntimeEvent>,
        dispatched: Arc<Mutex<Vec<(ResourceKind, TriggerReason)>>>,
    ) -> Self {
        Self {
            runtime_tx,
            dispatched,
        }
    }
}

impl PipelineBackend for FakeBackend {
    fn spawn_pipeline(
        &mut self,
        kind: ResourceKind,
        reason: TriggerReason,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.runtime_tx.clone();
        let dispatched = Arc::clone(&self.dispatched);

        Box::pin(async move {
            {
                let mut guard = dispatched.lock().unwrap();
                guard.push((kind, reason));
            }

            tx.send(RuntimeEvent::PipelineFinished {
                kind,
                outcome: PipelineOutcome::Success,
            })
            .await
            .map_err(anyhow::Error::from)?;
            Ok(())
        })
    }
}
