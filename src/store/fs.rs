use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use uuid::Uuid;

use super::{ArtifactKind, ArtifactStore};

/// File-per-artifact store.
///
/// Layout:
/// - `{ideas_dir}/{id}.json`: idea record
/// - `{ideas_dir}/{id}_graph.json`: graph
/// - `{plans_dir}/{id}.md`: plan markdown
///
/// Each write goes to a temporary file in the target directory which is then
/// renamed over the destination.
#[derive(Debug, Clone)]
pub struct FsStore {
    ideas_dir: PathBuf,
    plans_dir: PathBuf,
}

impl FsStore {
    pub fn new(ideas_dir: impl Into<PathBuf>, plans_dir: impl Into<PathBuf>) -> Self {
        Self {
            ideas_dir: ideas_dir.into(),
            plans_dir: plans_dir.into(),
        }
    }

    pub fn path_for(&self, idea_id: Uuid, kind: ArtifactKind) -> PathBuf {
        match kind {
            ArtifactKind::Idea => self.ideas_dir.join(format!("{}.json", idea_id)),
            ArtifactKind::Graph => self.ideas_dir.join(format!("{}_graph.json", idea_id)),
            ArtifactKind::Plan => self.plans_dir.join(format!("{}.md", idea_id)),
        }
    }

    fn write_atomic(path: &Path, blob: &[u8]) -> Result<()> {
        let dir = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Artifact path {} has no parent directory", path.display()))?;
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;

        let mut tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
        tmp.write_all(blob)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to move artifact into place at {}", path.display()))?;
        Ok(())
    }
}

impl ArtifactStore for FsStore {
    fn put(&self, idea_id: Uuid, kind: ArtifactKind, blob: &[u8]) -> Result<()> {
        let path = self.path_for(idea_id, kind);
        Self::write_atomic(&path, blob)?;
        tracing::debug!(%idea_id, %kind, path = %path.display(), "artifact written");
        Ok(())
    }

    fn get(&self, idea_id: Uuid, kind: ArtifactKind) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(idea_id, kind);
        match std::fs::read(&path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_leave_no_temporary_files_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path().join("ideas"), dir.path().join("plans"));
        let id = Uuid::new_v4();

        store.put(id, ArtifactKind::Idea, b"{}").unwrap();
        store.put(id, ArtifactKind::Idea, b"{\"v\": 2}").unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path().join("ideas"))
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from(format!("{}.json", id))]);
    }

    #[test]
    fn plans_live_in_their_own_directory() {
        let store = FsStore::new("/data/ideas", "/data/plans");
        let id = Uuid::nil();
        assert_eq!(
            store.path_for(id, ArtifactKind::Plan),
            PathBuf::from(format!("/data/plans/{}.md", id))
        );
        assert_eq!(
            store.path_for(id, ArtifactKind::Graph),
            PathBuf::from(format!("/data/ideas/{}_graph.json", id))
        );
    }
}
