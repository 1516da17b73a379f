use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{anyhow, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

use super::{schema, ArtifactKind, ArtifactStore};

/// SQLite-backed artifact store.
///
/// All artifacts live in one `artifacts` table keyed by `(idea_id, kind)`.
/// A put is a single upsert statement, so it is atomic without an explicit
/// transaction.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn default_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "ideaplan")
            .ok_or_else(|| anyhow!("Could not determine data directory"))?;
        Ok(dirs.data_dir().join("ideaplan.db"))
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.lock()?;
        schema::ensure_schema(&conn)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| anyhow!("database lock poisoned"))
    }
}

impl ArtifactStore for SqliteStore {
    fn put(&self, idea_id: Uuid, kind: ArtifactKind, blob: &[u8]) -> Result<()> {
        let conn = self.lock()?;
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO artifacts (idea_id, kind, blob, updated_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(idea_id, kind) DO UPDATE SET blob = excluded.blob, updated_at = excluded.updated_at",
            (idea_id.to_string(), kind.as_str(), blob, &now),
        )?;
        tracing::debug!(%idea_id, %kind, "artifact written");
        Ok(())
    }

    fn get(&self, idea_id: Uuid, kind: ArtifactKind) -> Result<Option<Vec<u8>>> {
        let conn = self.lock()?;
        let blob = conn
            .query_row(
                "SELECT blob FROM artifacts WHERE idea_id = ?1 AND kind = ?2",
                (idea_id.to_string(), kind.as_str()),
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(blob)
    }
}
