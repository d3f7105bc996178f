use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use assetpipe::pipeline::{Collaborator, Collaborators, StageOutcome, StageRequest};

/// A fake collaborator that:
/// - records every `StageRequest` it receives (shared log across stages)
/// - writes a small file at the requested output (and source map), or
/// - fails with a diagnostic when told to.
#[derive(Clone)]
pub struct RecordingCollaborator {
    calls: Arc<Mutex<Vec<StageRequest>>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl RecordingCollaborator {
    pub fn new(calls: Arc<Mutex<Vec<StageRequest>>>) -> Self {
        Self {
            calls,
            failure: Arc::new(Mutex::new(None)),
        }
    }

    /// Make every following invocation fail with `diagnostic`.
    pub fn fail_with(&self, diagnostic: &str) {
        *self.failure.lock().unwrap() = Some(diagnostic.to_string());
    }

    pub fn succeed(&self) {
        *self.failure.lock().unwrap() = None;
    }
}

impl Collaborator for RecordingCollaborator {
    fn invoke(
        &self,
        request: StageRequest,
    ) -> Pin<Box<dyn Future<Output = StageOutcome> + Send + '_>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(request.clone());

            let failure = self.failure.lock().unwrap().clone();
            if let Some(diagnostic) = failure {
                return StageOutcome::Failed { diagnostic };
            }

            let body = format!("// {} from {} inputs\n", request.stage, request.inputs.len());
            if let Err(err) = std::fs::write(&request.output, body) {
                return StageOutcome::Failed {
                    diagnostic: format!("fake collaborator cannot write output: {err}"),
                };
            }
            if let Some(map) = &request.source_map {
                if let Err(err) = std::fs::write(map, "{}") {
                    return StageOutcome::Failed {
                        diagnostic: format!("fake collaborator cannot write map: {err}"),
                    };
                }
            }
            StageOutcome::Success
        })
    }
}

/// One recording collaborator per stage, all logging into `calls`.
pub fn recording_collaborators(
    calls: &Arc<Mutex<Vec<StageRequest>>>,
) -> (Collaborators, RecordingCollaborator) {
    let collaborator = RecordingCollaborator::new(Arc::clone(calls));
    let shared: Arc<dyn Collaborator> = Arc::new(collaborator.clone());
    let collaborators = Collaborators {
        transpiler: Arc::clone(&shared),
        compiler: Arc::clone(&shared),
        style_processor: shared,
    };
    (collaborators, collaborator)
}
