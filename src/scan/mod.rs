// src/scan/mod.rs

//! Source discovery.
//!
//! Expands configured roots (files or directories) into the ordered list of
//! source files the pipelines and the watcher operate on. Roots keep their
//! configured order; within a directory, entries are visited by name so that
//! repeated scans of an unchanged tree are identical.

pub mod pattern;
pub mod scanner;

pub use pattern::ExtensionPattern;
pub use scanner::{is_backup_entry, scan_sources, ScanIter, SourceScan, BACKUP_MARKER};
