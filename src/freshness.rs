// src/freshness.rs

//! Mtime-based staleness decisions for compiled artifacts.
//!
//! Only modification times are compared. A touched-but-unchanged source
//! forces a rebuild and a clock rollback can hide one; content hashing is
//! deliberately not used here.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

use crate::fs::FileSystem;
use crate::scan::{ExtensionPattern, SourceScan};

/// Outcome of a staleness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Staleness {
    /// No roots configured for this kind; nothing to build.
    NoInputs,
    /// The artifact is missing or has no readable modification time.
    MissingArtifact,
    /// The first input found that is newer than the artifact.
    NewerInput(PathBuf),
    /// Every input is at least as old as the artifact.
    UpToDate,
}

impl Staleness {
    pub fn needs_compile(&self) -> bool {
        matches!(self, Staleness::MissingArtifact | Staleness::NewerInput(_))
    }
}

/// Decide whether `artifact` must be rebuilt from the sources under `roots`.
///
/// Stops at the first input newer than the artifact. Inputs that cannot be
/// stat-ed (e.g. deleted mid-scan) count as not newer.
pub fn check_staleness(
    fs: &dyn FileSystem,
    roots: &[PathBuf],
    pattern: &ExtensionPattern,
    artifact: &Path,
) -> Staleness {
    if roots.is_empty() {
        return Staleness::NoInputs;
    }

    let artifact_time = match artifact_mtime(fs, artifact) {
        Some(t) => t,
        None => {
            debug!(?artifact, "artifact missing; compilation required");
            return Staleness::MissingArtifact;
        }
    };

    let newer = SourceScan::new(fs, roots, pattern)
        .iter()
        .find(|input| is_newer(fs, input, artifact_time));

    match newer {
        Some(input) => {
            debug!(?input, ?artifact, "input newer than artifact");
            Staleness::NewerInput(input)
        }
        None => Staleness::UpToDate,
    }
}

fn artifact_mtime(fs: &dyn FileSystem, artifact: &Path) -> Option<SystemTime> {
    fs.metadata(artifact).ok().and_then(|meta| meta.modified)
}

fn is_newer(fs: &dyn FileSystem, input: &Path, than: SystemTime) -> bool {
    fs.modified(input).map(|t| t > than).unwrap_or(false)
}
