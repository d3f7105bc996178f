// src/watch/state.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Per-file modification-time bookkeeping for the watcher.
///
/// - `observed` is the newest mtime seen for a file (the poller's "previous").
/// - `committed` is the mtime of the last change that was acted upon.
///
/// A notification is a real change only if its mtime is strictly newer than
/// both. This drops repeated notifications for the same write as well as
/// out-of-order ones after an mtime moved backwards.
#[derive(Debug, Default)]
pub struct WatchState {
    observed: HashMap<PathBuf, Option<SystemTime>>,
    committed: HashMap<PathBuf, SystemTime>,
}

impl WatchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `path` with its mtime at discovery time.
    pub fn track(&mut self, path: impl Into<PathBuf>, mtime: Option<SystemTime>) {
        self.observed.insert(path.into(), mtime);
    }

    pub fn is_tracked(&self, path: &Path) -> bool {
        self.observed.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.observed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    /// Record a fresh stat of `path`. Returns `true` if it is a new change.
    ///
    /// Untracked paths are never accepted.
    pub fn observe(&mut self, path: &Path, mtime: SystemTime) -> bool {
        let Some(previous) = self.observed.get_mut(path) else {
            return false;
        };

        let newer_than_previous = previous.is_none_or(|p| mtime > p);
        let newer_than_committed = self.committed.get(path).is_none_or(|c| mtime > *c);
        *previous = Some(previous.map_or(mtime, |p| p.max(mtime)));

        let accepted = newer_than_previous && newer_than_committed;
        if accepted {
            self.committed.insert(path.to_path_buf(), mtime);
        }
        accepted
    }

    /// Forget everything (teardown).
    pub fn clear(&mut self) {
        self.observed.clear();
        self.committed.clear();
    }
}
