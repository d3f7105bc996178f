// src/watch/watcher.rs

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, PollWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::SourceRoots;
use crate::engine::{RuntimeEvent, TriggerReason};
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::scan::{scan_sources, ExtensionPattern};
use crate::types::ResourceKind;
use crate::watch::debounce::Debouncer;
use crate::watch::event_handler::process_file_change;
use crate::watch::state::WatchState;

/// How often each file's mtime is polled.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Quiet period before a kind's changes trigger a rebuild.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Timing knobs for the watcher.
#[derive(Debug, Clone, Copy)]
pub struct WatchOptions {
    pub poll_interval: Duration,
    pub debounce: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

/// Every source file the watcher subscribes to, in discovery order and
/// without duplicates: scripts and templates, externs, stylesheets and
/// style includes.
pub fn discover_watched_files(fs: &dyn FileSystem, roots: &SourceRoots) -> Vec<PathBuf> {
    let groups = [
        (&roots.scripts, ExtensionPattern::script_inputs()),
        (&roots.externs, ExtensionPattern::scripts()),
        (&roots.styles, ExtensionPattern::styles()),
    ];

    let mut seen = HashSet::new();
    let mut files = Vec::new();
    for (group_roots, pattern) in groups {
        for path in scan_sources(fs, group_roots, &pattern) {
            if seen.insert(path.clone()) {
                files.push(path);
            }
        }
    }
    files
}

/// Handle for the file watcher.
///
/// Dropping (or calling [`WatcherHandle::shutdown`]) unsubscribes every
/// file, clears the discovered list and stops the event task together with
/// its debouncer.
pub struct WatcherHandle {
    watcher: Option<PollWatcher>,
    files: Vec<PathBuf>,
    task: JoinHandle<()>,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle")
            .field("files", &self.files.len())
            .finish_non_exhaustive()
    }
}

impl WatcherHandle {
    /// Files currently subscribed to.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn shutdown(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if let Some(mut watcher) = self.watcher.take() {
            for file in &self.files {
                if let Err(err) = watcher.unwatch(file) {
                    debug!(?file, error = %err, "unwatch failed");
                }
            }
            info!(files = self.files.len(), "file watcher stopped");
        }
        self.files.clear();
        self.task.abort();
    }
}

impl Drop for WatcherHandle {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Spawn a polling watcher over every source file under `roots` and send
/// `RuntimeEvent::PipelineTriggered { reason: FileWatch }` once a kind's
/// changes have settled.
///
/// - `fs` is used for discovery and for re-reading mtimes on notification.
/// - `runtime_tx` is the channel into the main runtime.
pub fn spawn_watcher(
    fs: Arc<dyn FileSystem>,
    roots: &SourceRoots,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    options: WatchOptions,
) -> Result<WatcherHandle> {
    let files = discover_watched_files(&*fs, roots);

    let mut state = WatchState::new();
    for file in &files {
        state.track(file.clone(), fs.modified(file).ok());
    }

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let config = Config::default()
        .with_poll_interval(options.poll_interval)
        .with_compare_contents(false);

    let mut watcher = PollWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if event_tx.send(event).is_err() {
                    debug!("watcher event loop gone; dropping notify event");
                }
            }
            Err(err) => warn!(error = %err, "file watch error"),
        },
        config,
    )?;

    for file in &files {
        if let Err(err) = watcher.watch(file, RecursiveMode::NonRecursive) {
            warn!(?file, error = %err, "cannot watch file");
        }
    }

    info!(
        files = files.len(),
        poll_ms = options.poll_interval.as_millis() as u64,
        "file watcher started"
    );

    let task = tokio::spawn(async move {
        let debouncer = Debouncer::spawn(options.debounce, runtime_tx, |kind: ResourceKind| {
            RuntimeEvent::PipelineTriggered {
                kind,
                reason: TriggerReason::FileWatch,
            }
        });

        while let Some(event) = event_rx.recv().await {
            debug!(?event, "received notify event");
            for path in event.paths {
                if let Some(kind) = process_file_change(&*fs, &mut state, &path) {
                    debouncer.kick(kind);
                }
            }
        }

        state.clear();
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle {
        watcher: Some(watcher),
        files,
        task,
    })
}
