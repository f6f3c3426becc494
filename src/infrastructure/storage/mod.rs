//! File-based storage implementation

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::application::errors::StorageError;
use crate::domain::traits::Store;

/// JSON file store holding one whole document
///
/// Every save rewrites the file. There is no locking across processes.
pub struct JsonStore<T> {
    path: PathBuf,
    _document: PhantomData<fn() -> T>,
}

impl<T> JsonStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _document: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl<T> JsonStore<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    fn try_load(&self) -> Result<Option<T>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn try_save(&self, document: &T) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(document)?;
        let temp = self.temp_path();
        std::fs::write(&temp, content)?;
        std::fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

impl<T> Store<T> for JsonStore<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    fn load(&self) -> T {
        match self.try_load() {
            Ok(Some(document)) => {
                tracing::debug!("Loaded {}", self.path.display());
                document
            }
            Ok(None) => {
                tracing::info!("No data at {}, starting empty", self.path.display());
                T::default()
            }
            Err(e) => {
                tracing::warn!("Data at {} is unreadable, starting empty: {}", self.path.display(), e);
                T::default()
            }
        }
    }

    fn save(&self, document: &T) -> Result<(), StorageError> {
        self.try_save(document).map_err(|e| {
            tracing::error!("Failed to save {}: {}", self.path.display(), e);
            e
        })
    }
}

/// In-memory store for tests and throwaway runs
pub struct MemoryStore<T> {
    document: Mutex<T>,
    saves: Mutex<usize>,
}

impl<T: Clone + Default> MemoryStore<T> {
    pub fn new() -> Self {
        Self::with_document(T::default())
    }

    pub fn with_document(document: T) -> Self {
        Self {
            document: Mutex::new(document),
            saves: Mutex::new(0),
        }
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.saves.lock().map(|n| *n).unwrap_or_default()
    }
}

impl<T: Clone + Default> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Store<T> for MemoryStore<T>
where
    T: Clone + Default + Send,
{
    fn load(&self) -> T {
        self.document
            .lock()
            .map(|doc| doc.clone())
            .unwrap_or_default()
    }

    fn save(&self, document: &T) -> Result<(), StorageError> {
        let mut stored = self
            .document
            .lock()
            .map_err(|_| StorageError::Poisoned("memory store".to_string()))?;
        *stored = document.clone();
        if let Ok(mut saves) = self.saves.lock() {
            *saves += 1;
        }
        Ok(())
    }
}
