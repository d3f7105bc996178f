// src/orchestrator.rs

//! Library entry point: an explicitly constructed orchestrator instance.
//!
//! ```no_run
//! # async fn demo(cfg: assetpipe::config::BuildConfig) -> assetpipe::errors::Result<()> {
//! let orchestrator = assetpipe::create(cfg)
//!     .on_settled(|| println!("assets ready"))
//!     .build();
//! println!("script: {}", orchestrator.script_artifact_name());
//! orchestrator.run().await
//! # }
//! ```

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::config::BuildConfig;
use crate::engine::{
    CoreRuntime, Runtime, RuntimeEvent, RuntimeOptions, SettledCallback, TriggerReason,
};
use crate::errors::Result;
use crate::fingerprint::ArtifactNames;
use crate::freshness::{check_staleness, Staleness};
use crate::fs::{FileSystem, RealFileSystem};
use crate::pipeline::{Collaborators, PipelineContext, RealPipelineBackend};
use crate::scan::ExtensionPattern;
use crate::types::ResourceKind;
use crate::watch::{spawn_watcher, WatchOptions};

/// Capacity of the runtime event channel.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Start configuring an orchestrator for `config`.
///
/// Each call produces an independent instance; nothing is shared globally.
pub fn create(config: BuildConfig) -> OrchestratorBuilder {
    OrchestratorBuilder {
        config,
        fs: None,
        collaborators: None,
        on_settled: None,
        watch: None,
        watch_options: WatchOptions::default(),
    }
}

/// Builder returned by [`create`].
pub struct OrchestratorBuilder {
    config: BuildConfig,
    fs: Option<Arc<dyn FileSystem>>,
    collaborators: Option<Collaborators>,
    on_settled: Option<SettledCallback>,
    watch: Option<bool>,
    watch_options: WatchOptions,
}

impl OrchestratorBuilder {
    /// Filesystem used for scanning, staleness checks and committing
    /// artifacts. Defaults to [`RealFileSystem`].
    pub fn file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = Some(fs);
        self
    }

    /// Replace the external tools from `[tools]`.
    pub fn collaborators(mut self, collaborators: Collaborators) -> Self {
        self.collaborators = Some(collaborators);
        self
    }

    /// Called each time every started pipeline has finished.
    pub fn on_settled<F>(mut self, callback: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        self.on_settled = Some(Box::new(callback));
        self
    }

    /// Force watching on or off. Defaults to the inverse of `no_watch`.
    pub fn watch(mut self, enabled: bool) -> Self {
        self.watch = Some(enabled);
        self
    }

    pub fn watch_options(mut self, options: WatchOptions) -> Self {
        self.watch_options = options;
        self
    }

    pub fn build(self) -> Orchestrator {
        let fs = self.fs.unwrap_or_else(|| Arc::new(RealFileSystem));
        let collaborators = self
            .collaborators
            .unwrap_or_else(|| Collaborators::from_config(&self.config));
        let watch = self.watch.unwrap_or(!self.config.no_watch);
        let artifacts = ArtifactNames::new(&self.config);

        Orchestrator {
            ctx: PipelineContext {
                config: Arc::new(self.config),
                artifacts,
                fs,
                collaborators,
            },
            on_settled: self.on_settled,
            watch,
            watch_options: self.watch_options,
        }
    }
}

/// A configured orchestrator, ready to run.
pub struct Orchestrator {
    ctx: PipelineContext,
    on_settled: Option<SettledCallback>,
    watch: bool,
    watch_options: WatchOptions,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("artifacts", &self.ctx.artifacts)
            .field("watch", &self.watch)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    /// File name of the compiled script artifact.
    pub fn script_artifact_name(&self) -> &str {
        self.ctx.artifacts.script_artifact_name()
    }

    /// File name of the processed style artifact.
    pub fn style_artifact_name(&self) -> &str {
        self.ctx.artifacts.style_artifact_name()
    }

    pub fn artifacts(&self) -> &ArtifactNames {
        &self.ctx.artifacts
    }

    pub fn config(&self) -> &BuildConfig {
        &self.ctx.config
    }

    pub fn watches(&self) -> bool {
        self.watch
    }

    /// Staleness of both artifacts right now, script first.
    pub fn startup_decisions(&self) -> Vec<(ResourceKind, Staleness)> {
        ResourceKind::ALL
            .iter()
            .map(|&kind| {
                let (pattern, artifact) = match kind {
                    ResourceKind::Script => {
                        (ExtensionPattern::script_inputs(), self.ctx.artifacts.script_path())
                    }
                    ResourceKind::Style => {
                        (ExtensionPattern::styles(), self.ctx.artifacts.style_path())
                    }
                };
                let roots = self.ctx.config.staleness_roots(kind);
                let decision = check_staleness(&*self.ctx.fs, &roots, &pattern, &artifact);
                (kind, decision)
            })
            .collect()
    }

    /// Build stale artifacts, then watch until the process ends.
    ///
    /// Without watching this returns after the first settle.
    pub async fn run(self) -> Result<()> {
        self.run_until(std::future::pending::<()>()).await
    }

    /// Like [`Orchestrator::run`], but stops once `shutdown` completes.
    ///
    /// Pipelines still in flight are not cancelled; their completions are
    /// dropped and the callback does not fire for them.
    pub async fn run_until<S>(self, shutdown: S) -> Result<()>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        let decisions = self.startup_decisions();

        let Orchestrator {
            ctx,
            on_settled,
            watch,
            watch_options,
        } = self;

        let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(EVENT_CHANNEL_CAPACITY);

        let watcher = if watch {
            Some(spawn_watcher(
                Arc::clone(&ctx.fs),
                &ctx.config.roots,
                rt_tx.clone(),
                watch_options,
            )?)
        } else {
            None
        };

        let shutdown_task = {
            let tx = rt_tx.clone();
            tokio::spawn(async move {
                shutdown.await;
                if tx.send(RuntimeEvent::ShutdownRequested).await.is_err() {
                    debug!("runtime already stopped; ignoring shutdown request");
                }
            })
        };

        for (kind, decision) in decisions {
            if decision.needs_compile() {
                info!(%kind, ?decision, "artifact out of date; building at startup");
                rt_tx
                    .send(RuntimeEvent::PipelineTriggered {
                        kind,
                        reason: TriggerReason::Startup,
                    })
                    .await
                    .map_err(anyhow::Error::from)?;
            } else {
                info!(%kind, ?decision, "no startup build needed");
            }
        }
        rt_tx
            .send(RuntimeEvent::StartupComplete)
            .await
            .map_err(anyhow::Error::from)?;

        let backend = RealPipelineBackend::new(ctx, rt_tx);
        let core = CoreRuntime::new(RuntimeOptions {
            exit_when_idle: !watch,
        });
        let result = Runtime::new(core, rt_rx, backend)
            .with_on_settled(on_settled)
            .run()
            .await;

        shutdown_task.abort();
        if let Some(handle) = watcher {
            handle.shutdown();
        }
        result
    }
}
