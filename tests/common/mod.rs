#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

#[allow(unused_imports)]
pub use assetpipe_test_utils::builders;
#[allow(unused_imports)]
pub use assetpipe_test_utils::init_tracing;

/// Write `contents` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(&path, contents).expect("write file");
}

/// Set the mtime of `root/rel` to `offset` relative to now (negative = past).
pub fn set_mtime(root: &Path, rel: &str, offset_secs: i64) {
    let now = SystemTime::now();
    let when = if offset_secs >= 0 {
        now + Duration::from_secs(offset_secs as u64)
    } else {
        now - Duration::from_secs(offset_secs.unsigned_abs())
    };
    let file = fs::OpenOptions::new()
        .write(true)
        .open(root.join(rel))
        .expect("open file for mtime update");
    file.set_modified(when).expect("set mtime");
}
