//! # Content Backends
//!
//! Raw string storage under flat keys. Backends know nothing about
//! documents or schemas; [`DocumentStore`](crate::DocumentStore) layers
//! encoding and decoding on top.
//!
//! - [`MemoryStore`]: a shared map, cloneable across threads.
//! - [`DirStore`]: one `<key>.json` file per key under a root directory.
//!   Writes go to a temporary sibling first and are renamed into place, so
//!   a reader never observes a half-written file.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

/// String-keyed content storage.
pub trait ContentStore: Send + Sync {
    /// The stored text, or `None` when the key is absent.
    fn get(&self, key: &str) -> io::Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous content.
    fn put(&self, key: &str, value: &str) -> io::Result<()>;

    /// Delete `key`. Returns whether it existed.
    fn remove(&self, key: &str) -> io::Result<bool>;

    /// Every stored key, sorted.
    fn keys(&self) -> io::Result<Vec<String>>;
}

/// Whether `key` is usable by every backend.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

// ─── Memory ──────────────────────────────────────────────────────────

/// Thread-safe, cloneable in-memory backend. Clones share content.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ContentStore for MemoryStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.data.read().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> io::Result<()> {
        self.data.write().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<bool> {
        Ok(self.data.write().remove(key).is_some())
    }

    fn keys(&self) -> io::Result<Vec<String>> {
        let mut keys: Vec<String> = self.data.read().keys().cloned().collect();
        keys.sort_unstable();
        Ok(keys)
    }
}

// ─── Directory ───────────────────────────────────────────────────────

const EXTENSION: &str = "json";

/// Filesystem backend rooted at a directory, created on first write.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The file a key is stored in.
    pub fn path_for(&self, key: &str) -> io::Result<PathBuf> {
        if !is_valid_key(key) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid store key {key:?}"),
            ));
        }
        Ok(self.root.join(format!("{key}.{EXTENSION}")))
    }
}

impl ContentStore for DirStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn put(&self, key: &str, value: &str) -> io::Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root)?;
        let staging = path.with_extension(format!("{EXTENSION}.tmp"));
        fs::write(&staging, value)?;
        fs::rename(&staging, &path)
    }

    fn remove(&self, key: &str) -> io::Result<bool> {
        match fs::remove_file(self.path_for(key)?) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err),
        }
    }

    fn keys(&self) -> io::Result<Vec<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };
        let mut keys = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if is_valid_key(stem) {
                    keys.push(stem.to_owned());
                }
            }
        }
        keys.sort_unstable();
        Ok(keys)
    }
}
