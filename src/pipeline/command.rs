// src/pipeline/command.rs

//! Collaborator backed by an external process.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::collaborator::{Collaborator, StageOutcome, StageRequest};

/// Runs `argv[0] argv[1..] <request args>` and waits for it to exit.
///
/// - Exit status 0 is success; anything written to stderr is surfaced at
///   `warn` level.
/// - A non-zero exit is a failure whose diagnostic is stderr (or stdout when
///   stderr is empty), kept verbatim so source excerpts survive.
#[derive(Debug, Clone)]
pub struct CommandCollaborator {
    argv: Vec<String>,
}

impl CommandCollaborator {
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }

    async fn run(&self, request: &StageRequest) -> Result<StageOutcome> {
        let (program, prefix) = self
            .argv
            .split_first()
            .context("collaborator command is empty")?;

        let mut cmd = Command::new(program);
        cmd.args(prefix)
            .args(request.to_args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        info!(
            stage = %request.stage,
            program = %program,
            inputs = request.inputs.len(),
            output = ?request.output,
            "invoking collaborator"
        );

        let output = cmd
            .output()
            .await
            .with_context(|| format!("spawning collaborator '{}'", program))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if output.status.success() {
            if !stderr.trim().is_empty() {
                warn!(stage = %request.stage, "collaborator warnings:\n{}", stderr.trim_end());
            }
            debug!(stage = %request.stage, "collaborator exited successfully");
            return Ok(StageOutcome::Success);
        }

        let diagnostic = if stderr.trim().is_empty() {
            stdout.into_owned()
        } else {
            stderr.into_owned()
        };
        let code = output.status.code().unwrap_or(-1);

        Ok(StageOutcome::Failed {
            diagnostic: format!("exit code {code}\n{}", diagnostic.trim_end()),
        })
    }
}

impl Collaborator for CommandCollaborator {
    fn invoke(
        &self,
        request: StageRequest,
    ) -> Pin<Box<dyn Future<Output = StageOutcome> + Send + '_>> {
        Box::pin(async move {
            match self.run(&request).await {
                Ok(outcome) => outcome,
                Err(err) => StageOutcome::Failed {
                    diagnostic: format!("{err:#}"),
                },
            }
        })
    }
}
