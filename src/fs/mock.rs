// src/fs/mock.rs

use super::{FileMeta, FileSystem};
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

#[derive(Debug, Clone)]
pub enum MockEntry {
    /// `modified: None` models a platform that cannot report mtimes.
    File { modified: Option<SystemTime> },
    Dir(Vec<String>), // List of child names
}

#[derive(Debug, Default)]
struct MockState {
    entries: HashMap<PathBuf, MockEntry>,
    /// Seconds past the mock epoch handed to the next added/touched file.
    clock: u64,
}

/// In-memory tree whose file mtimes advance one second per write.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

/// Base of the mock clock; far enough from `UNIX_EPOCH` to look real.
fn mock_epoch() -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)
}

impl MockFileSystem {
    pub fn new() -> Self {
        let fs = Self::default();
        fs.state
            .lock()
            .unwrap()
            .entries
            .insert(PathBuf::from("/"), MockEntry::Dir(Vec::new()));
        fs
    }

    /// Add (or overwrite) a file, stamping it with the next clock tick.
    pub fn add_file(&self, path: impl AsRef<Path>) -> SystemTime {
        let mut state = self.state.lock().unwrap();
        state.clock += 1;
        let modified = mock_epoch() + Duration::from_secs(state.clock);
        Self::insert_file(&mut state, path.as_ref(), Some(modified));
        modified
    }

    /// Add (or overwrite) a file with an explicit modification time.
    pub fn add_file_at(&self, path: impl AsRef<Path>, modified: SystemTime) {
        let mut state = self.state.lock().unwrap();
        Self::insert_file(&mut state, path.as_ref(), Some(modified));
    }

    /// Add (or overwrite) a file whose modification time cannot be read.
    pub fn add_file_without_mtime(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        Self::insert_file(&mut state, path.as_ref(), None);
    }

    /// Add an empty directory.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        Self::ensure_dir_entry(&mut state.entries, path.as_ref());
    }

    /// Remove a single entry (file or directory node).
    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut state = self.state.lock().unwrap();
        state.entries.remove(path);
        if let (Some(parent), Some(name)) = (path.parent(), path.file_name()) {
            if let Some(MockEntry::Dir(children)) = state.entries.get_mut(parent) {
                let name = name.to_string_lossy();
                children.retain(|c| c.as_str() != name);
            }
        }
    }

    fn insert_file(state: &mut MockState, path: &Path, modified: Option<SystemTime>) {
        state
            .entries
            .insert(path.to_path_buf(), MockEntry::File { modified });
        if let Some(parent) = path.parent() {
            Self::ensure_dir_entry(&mut state.entries, parent);
            Self::link_child(&mut state.entries, parent, path);
        }
    }

    fn ensure_dir_entry(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        if entries.contains_key(path) {
            return;
        }
        entries.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
        if let Some(parent) = path.parent() {
            if parent != path {
                Self::ensure_dir_entry(entries, parent);
                Self::link_child(entries, parent, path);
            }
        }
    }

    fn link_child(entries: &mut HashMap<PathBuf, MockEntry>, parent: &Path, child: &Path) {
        if let Some(MockEntry::Dir(children)) = entries.get_mut(parent) {
            if let Some(name) = child.file_name().and_then(|n| n.to_str()) {
                if !children.iter().any(|c| c == name) {
                    children.push(name.to_string());
                }
            }
        }
    }
}

impl FileSystem for MockFileSystem {
    fn metadata(&self, path: &Path) -> Result<FileMeta> {
        let state = self.state.lock().unwrap();
        match state.entries.get(path) {
            Some(MockEntry::File { modified }) => Ok(FileMeta {
                is_dir: false,
                modified: *modified,
            }),
            Some(MockEntry::Dir(_)) => Ok(FileMeta {
                is_dir: true,
                modified: None,
            }),
            None => Err(anyhow!("No such file or directory: {:?}", path)),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.state.lock().unwrap().entries.contains_key(path)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let state = self.state.lock().unwrap();
        match state.entries.get(path) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.add_dir(path);
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        let meta = self.metadata(from)?;
        if meta.is_dir {
            return Err(anyhow!("Cannot rename directory: {:?}", from));
        }
        self.remove(from);
        let mut state = self.state.lock().unwrap();
        Self::insert_file(&mut state, to, meta.modified);
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        if !self.exists(path) {
            return Err(anyhow!("No such file or directory: {:?}", path));
        }
        self.remove(path);
        Ok(())
    }
}
