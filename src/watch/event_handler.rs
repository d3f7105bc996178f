// src/watch/event_handler.rs

//! Turning raw poll notifications into accepted, classified changes.

use std::path::Path;

use tracing::debug;

use crate::fs::FileSystem;
use crate::types::ResourceKind;
use crate::watch::state::WatchState;

/// Process one notification for `path`.
///
/// Returns the kind to rebuild if this is a genuine change of a watched
/// source file:
/// 1. The path must be one of the discovered files.
/// 2. Its current mtime must be readable (it may have been deleted).
/// 3. The mtime must pass the duplicate/out-of-order filter.
/// 4. The extension must map to a pipeline kind.
pub fn process_file_change(
    fs: &dyn FileSystem,
    state: &mut WatchState,
    path: &Path,
) -> Option<ResourceKind> {
    if !state.is_tracked(path) {
        return None;
    }

    let mtime = match fs.modified(path) {
        Ok(t) => t,
        Err(err) => {
            debug!(?path, error = %err, "watched file no longer readable");
            return None;
        }
    };

    if !state.observe(path, mtime) {
        debug!(?path, "notification without a newer mtime; ignoring");
        return None;
    }

    let kind = ResourceKind::classify(path)?;
    debug!(?path, %kind, "source change accepted");
    Some(kind)
}
