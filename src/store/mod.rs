//! Artifact persistence.
//!
//! Every stage output is a blob keyed by `(idea id, kind)`. Writes replace the
//! previous blob atomically: a reader sees either the old artifact or the new
//! one, never a partial write. There is no delete.

mod fs;
mod schema;
mod sqlite;

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::config::{StorageConfig, StoreBackend};

pub use fs::FsStore;
pub use sqlite::SqliteStore;

/// The kind of artifact stored for an idea.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Idea,
    Graph,
    Plan,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idea => "idea",
            Self::Graph => "graph",
            Self::Plan => "plan",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key-value blob storage for pipeline artifacts.
pub trait ArtifactStore: Send + Sync {
    /// Persist `blob`, replacing any earlier value for the same key.
    fn put(&self, idea_id: Uuid, kind: ArtifactKind, blob: &[u8]) -> Result<()>;

    /// Fetch a blob, or `None` if nothing has been stored under the key.
    fn get(&self, idea_id: Uuid, kind: ArtifactKind) -> Result<Option<Vec<u8>>>;
}

/// Open the store selected by `config`, creating the SQLite schema if needed.
pub fn open_store(config: &StorageConfig) -> Result<Arc<dyn ArtifactStore>> {
    match config.backend {
        StoreBackend::Fs => {
            tracing::info!(
                ideas = %config.ideas_dir.display(),
                plans = %config.plans_dir.display(),
                "Using file artifact store"
            );
            Ok(Arc::new(FsStore::new(&config.ideas_dir, &config.plans_dir)))
        }
        StoreBackend::Sqlite => {
            let path = match &config.db_path {
                Some(path) => path.clone(),
                None => SqliteStore::default_path()?,
            };
            tracing::info!(path = %path.display(), "Using SQLite artifact store");
            let store = SqliteStore::open(path)?;
            store.migrate()?;
            Ok(Arc::new(store))
        }
    }
}

/// Serialize `value` as pretty JSON and store it.
pub fn save_json<T: Serialize>(
    store: &dyn ArtifactStore,
    idea_id: Uuid,
    kind: ArtifactKind,
    value: &T,
) -> Result<()> {
    let blob = serde_json::to_vec_pretty(value)
        .with_context(|| format!("Failed to serialize {} for idea {}", kind, idea_id))?;
    store.put(idea_id, kind, &blob)
}

/// Load and deserialize a JSON artifact.
pub fn load_json<T: DeserializeOwned>(
    store: &dyn ArtifactStore,
    idea_id: Uuid,
    kind: ArtifactKind,
) -> Result<Option<T>> {
    match store.get(idea_id, kind)? {
        Some(blob) => {
            let value = serde_json::from_slice(&blob)
                .with_context(|| format!("Stored {} for idea {} is corrupt", kind, idea_id))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

/// Store a text artifact (plans are kept as raw markdown).
pub fn save_text(store: &dyn ArtifactStore, idea_id: Uuid, kind: ArtifactKind, text: &str) -> Result<()> {
    store.put(idea_id, kind, text.as_bytes())
}

/// Load a text artifact.
pub fn load_text(store: &dyn ArtifactStore, idea_id: Uuid, kind: ArtifactKind) -> Result<Option<String>> {
    match store.get(idea_id, kind)? {
        Some(blob) => {
            let text = String::from_utf8(blob)
                .with_context(|| format!("Stored {} for idea {} is not UTF-8", kind, idea_id))?;
            Ok(Some(text))
        }
        None => Ok(None),
    }
}
