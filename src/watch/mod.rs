// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Discovering every source file up front.
//! - Polling their modification times (`notify::PollWatcher`).
//! - Dropping duplicate and out-of-order notifications (`state`).
//! - Coalescing accepted changes per kind (`debounce`).
//!
//! It does **not** consult the staleness check; a settled change always
//! triggers the matching pipeline.

pub mod debounce;
pub mod event_handler;
pub mod state;
pub mod watcher;

pub use debounce::Debouncer;
pub use event_handler::process_file_change;
pub use state::WatchState;
pub use watcher::{
    discover_watched_files, spawn_watcher, WatchOptions, WatcherHandle, DEFAULT_DEBOUNCE,
    DEFAULT_POLL_INTERVAL,
};
