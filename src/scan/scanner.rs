// src/scan/scanner.rs

//! Recursive, sorted source discovery.

use std::path::{Path, PathBuf};
use std::vec;

use tracing::{debug, warn};

use crate::fs::FileSystem;
use crate::scan::pattern::ExtensionPattern;

/// Name prefix of editor backup / lock entries that are never scanned.
pub const BACKUP_MARKER: &str = ".#";

/// True if the final segment of `path` starts with [`BACKUP_MARKER`].
pub fn is_backup_entry(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with(BACKUP_MARKER))
        .unwrap_or(false)
}

/// A restartable scan over an ordered set of roots.
///
/// Every call to [`SourceScan::iter`] walks the tree again from the first
/// root, so the same value can be consumed any number of times.
#[derive(Debug, Clone, Copy)]
pub struct SourceScan<'a> {
    fs: &'a dyn FileSystem,
    roots: &'a [PathBuf],
    pattern: &'a ExtensionPattern,
}

impl<'a> SourceScan<'a> {
    pub fn new(
        fs: &'a dyn FileSystem,
        roots: &'a [PathBuf],
        pattern: &'a ExtensionPattern,
    ) -> Self {
        Self { fs, roots, pattern }
    }

    /// Start a fresh lazy walk.
    pub fn iter(&self) -> ScanIter<'a> {
        ScanIter {
            fs: self.fs,
            pattern: self.pattern,
            roots: self.roots.iter(),
            stack: Vec::new(),
        }
    }

    /// Collect the whole walk.
    pub fn collect(&self) -> Vec<PathBuf> {
        self.iter().collect()
    }
}

impl<'a> IntoIterator for SourceScan<'a> {
    type Item = PathBuf;
    type IntoIter = ScanIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Depth-first walk. Each stack frame holds the not-yet-visited entries of
/// one directory, already sorted.
pub struct ScanIter<'a> {
    fs: &'a dyn FileSystem,
    pattern: &'a ExtensionPattern,
    roots: std::slice::Iter<'a, PathBuf>,
    stack: Vec<vec::IntoIter<PathBuf>>,
}

impl ScanIter<'_> {
    /// Visit one path: descend into directories, yield matching files.
    fn visit(&mut self, path: PathBuf, is_root: bool) -> Option<PathBuf> {
        if is_backup_entry(&path) {
            debug!(?path, "skipping backup entry");
            return None;
        }

        let meta = match self.fs.metadata(&path) {
            Ok(meta) => meta,
            Err(err) if is_root => {
                warn!(?path, error = %err, "cannot stat source root; skipping");
                return None;
            }
            Err(err) => {
                // Deleted between listing and stat.
                debug!(?path, error = %err, "entry vanished during scan");
                return None;
            }
        };

        if !meta.is_dir {
            return self.pattern.matches(&path).then_some(path);
        }

        match self.fs.read_dir(&path) {
            Ok(mut entries) => {
                entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
                self.stack.push(entries.into_iter());
            }
            Err(err) => {
                warn!(?path, error = %err, "cannot list directory; skipping");
            }
        }
        None
    }
}

impl Iterator for ScanIter<'_> {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            if let Some(frame) = self.stack.last_mut() {
                match frame.next() {
                    Some(path) => {
                        if let Some(found) = self.visit(path, false) {
                            return Some(found);
                        }
                    }
                    None => {
                        self.stack.pop();
                    }
                }
                continue;
            }

            let root = self.roots.next()?.clone();
            if let Some(found) = self.visit(root, true) {
                return Some(found);
            }
        }
    }
}

/// Convenience: scan `roots` with `pattern` and collect the result.
pub fn scan_sources(
    fs: &dyn FileSystem,
    roots: &[PathBuf],
    pattern: &ExtensionPattern,
) -> Vec<PathBuf> {
    SourceScan::new(fs, roots, pattern).collect()
}
