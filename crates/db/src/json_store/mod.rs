//! Document backend: the whole dataset in memory, optionally mirrored to a
//! JSON file.
//!
//! Writes run against the in-memory dataset under an exclusive lock, then
//! the full document is written to `<file>.tmp` and renamed over the data
//! file. If the mutation or the write fails, the dataset is rolled back to
//! its state before the call, so memory never gets ahead of disk.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::sync::RwLock;

mod collection;
mod content;
mod dataset;
mod sites;
mod tenants;

pub use collection::Collection;
pub use dataset::Dataset;

use crate::store::{Store, StoreResult};

/// [`Store`] over an in-process [`Dataset`].
pub struct JsonStore {
    data: RwLock<Dataset>,
    /// `None` for a purely in-memory store.
    path: Option<PathBuf>,
}

impl JsonStore {
    /// A store that never touches disk. Used by tests and `STORAGE_BACKEND=memory`.
    pub fn in_memory() -> Self {
        Self {
            data: RwLock::new(Dataset::default()),
            path: None,
        }
    }

    /// Load `path`, or start empty if the file does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();

        let dataset = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent).await?;
                }
                Dataset::default()
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(path = %path.display(), "Opened JSON data file");

        Ok(Self {
            data: RwLock::new(dataset),
            path: Some(path),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Run a read-only closure against the dataset.
    async fn read<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&Dataset) -> R + Send,
    {
        let data = self.data.read().await;
        f(&*data)
    }

    /// Run a mutation and persist it, rolling back on any failure.
    async fn write<R, F>(&self, f: F) -> StoreResult<R>
    where
        F: FnOnce(&mut Dataset) -> StoreResult<R> + Send,
        R: Send,
    {
        let mut data = self.data.write().await;
        let snapshot = data.clone();

        let result = match f(&mut *data) {
            Ok(value) => value,
            Err(e) => {
                *data = snapshot;
                return Err(e);
            }
        };

        if let Some(path) = &self.path {
            if let Err(e) = persist(path, &*data).await {
                tracing::error!(path = %path.display(), error = %e, "Failed to persist dataset");
                *data = snapshot;
                return Err(e);
            }
        }

        Ok(result)
    }
}

async fn persist(path: &Path, data: &Dataset) -> StoreResult<()> {
    let bytes = serde_json::to_vec_pretty(data)?;
    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, &bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

impl Store for JsonStore {
    fn backend_name(&self) -> &'static str {
        if self.path.is_some() {
            "json"
        } else {
            "memory"
        }
    }
}
