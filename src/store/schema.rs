//! Schema for the SQLite artifact table.
//!
//! The layout is versioned with `PRAGMA user_version`; a database written by a
//! newer build is refused rather than read with the wrong assumptions.

use anyhow::{bail, Context, Result};
use rusqlite::Connection;

pub const SCHEMA_VERSION: i32 = 1;

const CREATE_ARTIFACTS: &str = "CREATE TABLE IF NOT EXISTS artifacts (
    idea_id TEXT NOT NULL,
    kind TEXT NOT NULL,
    blob BLOB NOT NULL,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (idea_id, kind)
)";

/// Columns `SqliteStore` reads and writes.
const ARTIFACT_COLUMNS: [&str; 4] = ["idea_id", "kind", "blob", "updated_at"];

/// Bring the artifact table up to [`SCHEMA_VERSION`] and check its columns.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    let version = schema_version(conn)?;
    if version > SCHEMA_VERSION {
        bail!(
            "artifact database has schema version {}, newer than the supported {}",
            version,
            SCHEMA_VERSION
        );
    }

    if version < SCHEMA_VERSION {
        tracing::info!(from = version, to = SCHEMA_VERSION, "Creating artifact table");
        conn.execute_batch(&format!(
            "BEGIN; {}; PRAGMA user_version = {}; COMMIT;",
            CREATE_ARTIFACTS, SCHEMA_VERSION
        ))
        .context("Failed to create artifact table")?;
    }

    let missing = missing_columns(conn)?;
    if !missing.is_empty() {
        bail!("artifacts table is missing columns: {}", missing.join(", "));
    }
    Ok(())
}

pub fn schema_version(conn: &Connection) -> Result<i32> {
    Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
}

fn missing_columns(conn: &Connection) -> Result<Vec<&'static str>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('artifacts')")?;
    let present = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ARTIFACT_COLUMNS
        .into_iter()
        .filter(|column| !present.iter().any(|p| p == column))
        .collect())
}
