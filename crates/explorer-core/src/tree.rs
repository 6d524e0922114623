use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::IoError;
use crate::listing::{DirectoryLister, DirectoryNode};

/// The current directory and the most recent listing of it.
///
/// `current` is only ever replaced together with a successfully built
/// snapshot, so a failed rebuild leaves both at their previous values.
pub struct TreeState {
    lister: DirectoryLister,
    current: PathBuf,
    snapshot: DirectoryNode,
}

impl TreeState {
    pub fn new(lister: DirectoryLister, start: PathBuf) -> Result<Self, IoError> {
        let snapshot = lister.list(&start)?;
        Ok(Self {
            lister,
            current: start,
            snapshot,
        })
    }

    pub fn current(&self) -> &Path {
        &self.current
    }

    pub fn snapshot(&self) -> &DirectoryNode {
        &self.snapshot
    }

    pub fn lister(&self) -> &DirectoryLister {
        &self.lister
    }

    /// Move to `path` and rebuild. On failure nothing changes.
    pub fn set_current(&mut self, path: PathBuf) -> Result<&DirectoryNode, IoError> {
        match self.lister.list(&path) {
            Ok(snapshot) => {
                self.current = path;
                self.snapshot = snapshot;
                Ok(&self.snapshot)
            }
            Err(e) => {
                warn!(
                    "cannot enter {}, staying in {}: {}",
                    path.display(),
                    self.current.display(),
                    e
                );
                Err(e)
            }
        }
    }

    /// Rebuild the snapshot of the current directory. On failure the previous
    /// snapshot is kept.
    pub fn invalidate(&mut self) -> Result<&DirectoryNode, IoError> {
        self.snapshot = self.lister.list(&self.current)?;
        Ok(&self.snapshot)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use explorer_host::HostFileSystem;

    use super::*;

    fn state(root: &Path) -> TreeState {
        let lister = DirectoryLister::new(Arc::new(HostFileSystem::new()));
        TreeState::new(lister, root.to_path_buf()).unwrap()
    }

    #[test]
    fn test_initial_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("f"), b"").unwrap();

        let tree = state(dir.path());
        assert_eq!(tree.current(), dir.path());
        assert_eq!(tree.snapshot().names().collect::<Vec<_>>(), vec!["f"]);
    }

    #[test]
    fn test_new_fails_for_missing_start() {
        let dir = tempfile::tempdir().unwrap();
        let lister = DirectoryLister::new(Arc::new(HostFileSystem::new()));
        assert!(TreeState::new(lister, dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_set_current_rebuilds() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("inner"), b"").unwrap();

        let mut tree = state(dir.path());
        let snapshot = tree.set_current(sub.clone()).unwrap();
        assert_eq!(snapshot.path, sub);
        assert_eq!(tree.current(), sub);
        assert_eq!(tree.snapshot().names().collect::<Vec<_>>(), vec!["inner"]);
    }

    #[test]
    fn test_set_current_rolls_back_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("f"), b"").unwrap();

        let mut tree = state(dir.path());
        let before = tree.snapshot().clone();

        let err = tree.set_current(dir.path().join("vanished")).unwrap_err();
        assert_eq!(err, IoError::NotFound(dir.path().join("vanished")));
        assert_eq!(tree.current(), dir.path());
        assert_eq!(tree.snapshot(), &before);
    }

    #[test]
    fn test_invalidate_picks_up_changes() {
        let dir = tempfile::tempdir().unwrap();
        let mut tree = state(dir.path());
        assert!(tree.snapshot().is_empty());

        fs::write(dir.path().join("new"), b"").unwrap();
        assert!(tree.snapshot().is_empty());
        assert_eq!(tree.invalidate().unwrap().names().collect::<Vec<_>>(), vec!["new"]);
    }

    #[test]
    fn test_invalidate_keeps_old_snapshot_when_current_vanishes() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("f"), b"").unwrap();

        let mut tree = state(&sub);
        fs::remove_dir_all(&sub).unwrap();

        assert_eq!(tree.invalidate().unwrap_err(), IoError::NotFound(sub.clone()));
        assert_eq!(tree.snapshot().names().collect::<Vec<_>>(), vec!["f"]);
    }
}
