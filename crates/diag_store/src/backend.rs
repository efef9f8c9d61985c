use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DiagStoreError;

/// Key/value backend for diagnostics buffers.
///
/// Values are opaque strings; the diagnostics layer stores JSON in them.
/// Backends are single-threaded and make no cross-process atomicity promise.
pub trait Storage {
    fn load(&self, key: &str) -> Result<Option<String>, DiagStoreError>;
    fn store(&self, key: &str, value: &str) -> Result<(), DiagStoreError>;
    fn remove(&self, key: &str) -> Result<(), DiagStoreError>;
}

pub(crate) fn validate_key(key: &str) -> Result<(), DiagStoreError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-'));
    if !valid {
        return Err(DiagStoreError::invalid_key(key));
    }
    Ok(())
}

/// One file per key under a root directory. Keys double as file names,
/// hence the restricted key alphabet.
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, key: &str) -> Result<PathBuf, DiagStoreError> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl Storage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, DiagStoreError> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(DiagStoreError::io("reading diagnostics file", &path, err)),
        }
    }

    fn store(&self, key: &str, value: &str) -> Result<(), DiagStoreError> {
        let path = self.key_path(key)?;
        fs::create_dir_all(&self.root).map_err(|source| {
            DiagStoreError::io("creating diagnostics directory", &self.root, source)
        })?;
        fs::write(&path, value)
            .map_err(|source| DiagStoreError::io("writing diagnostics file", &path, source))
    }

    fn remove(&self, key: &str) -> Result<(), DiagStoreError> {
        let path = self.key_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(DiagStoreError::io("removing diagnostics file", &path, err)),
        }
    }
}

/// In-memory backend scoped to the owning process. Serves as the
/// session-scoped store and as the test backend.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, DiagStoreError> {
        validate_key(key)?;
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn store(&self, key: &str, value: &str) -> Result<(), DiagStoreError> {
        validate_key(key)?;
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), DiagStoreError> {
        validate_key(key)?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
