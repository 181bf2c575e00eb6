//! Durable Key-Value Storage
//!
//! Small string-to-string store that survives process restarts. Multi-key
//! writes and removals are applied as one unit: the file backend rewrites
//! the whole document through a temp file and a rename, so a crash leaves
//! either the old or the new document, never a mix.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex as StdMutex;

use kernel::error::app_error::AppError;
use thiserror::Error;
use tokio::sync::Mutex;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Storage document at {path} is corrupt: {message}")]
    Corrupt { path: PathBuf, message: String },

    #[error("Storage lock poisoned")]
    Poisoned,
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::internal("Durable storage failure").with_source(err)
    }
}

/// Trait for durable storage backends
#[trait_variant::make(KeyValueStore: Send)]
pub trait LocalKeyValueStore {
    /// Read one key
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write several keys as one unit
    async fn set_many(&self, entries: Vec<(String, String)>) -> Result<(), StorageError>;

    /// Remove several keys as one unit (missing keys are ignored)
    async fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError>;

    /// List stored keys
    async fn keys(&self) -> Result<Vec<String>, StorageError>;
}

type Document = BTreeMap<String, String>;

// ============================================================================
// File store
// ============================================================================

/// JSON-document file store
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Document, StorageError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(Document::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| StorageError::Corrupt {
                path: self.path.clone(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Document::new()),
            Err(source) => Err(StorageError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    async fn persist(&self, document: &Document) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let bytes = serde_json::to_vec_pretty(document).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &bytes).await.map_err(io_err)?;
        restrict_permissions(&tmp).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(io_err)?;
        Ok(())
    }
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load().await?.remove(key))
    }

    async fn set_many(&self, entries: Vec<(String, String)>) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.load().await?;
        document.extend(entries);
        self.persist(&document).await
    }

    async fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.load().await?;
        let before = document.len();
        for key in keys {
            document.remove(*key);
        }
        if document.len() == before {
            return Ok(());
        }
        if document.is_empty() {
            return match tokio::fs::remove_file(&self.path).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(source) => Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                }),
            };
        }
        self.persist(&document).await
    }

    async fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.load().await?.into_keys().collect())
    }
}

// ============================================================================
// Memory store
// ============================================================================

/// In-process store (tests, ephemeral sessions)
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: StdMutex<Document>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<R>(&self, f: impl FnOnce(&mut Document) -> R) -> Result<R, StorageError> {
        let mut guard = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(f(&mut guard))
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.with(|doc| doc.get(key).cloned())
    }

    async fn set_many(&self, entries: Vec<(String, String)>) -> Result<(), StorageError> {
        self.with(|doc| doc.extend(entries))
    }

    async fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError> {
        self.with(|doc| {
            for key in keys {
                doc.remove(*key);
            }
        })
    }

    async fn keys(&self) -> Result<Vec<String>, StorageError> {
        self.with(|doc| doc.keys().cloned().collect())
    }
}
