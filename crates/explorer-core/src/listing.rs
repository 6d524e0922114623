//! One-level directory listings.
//!
//! A [`DirectoryNode`] is an immutable snapshot of a directory's immediate
//! children. It is rebuilt from scratch on every navigation or mutation and
//! never patched in place.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use explorer_platform::filesystem::{FileKind, FileSystem, RawEntry};
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, warn};

use crate::error::IoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    File,
    Directory,
}

/// One immediate child of a listed directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub name: String,
    pub kind: EntryKind,
    pub path: PathBuf,
}

impl Entry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// A child that showed up in the enumeration but could not be classified
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DegradedEntry {
    /// Lossy display name; `None` when the entry could not be read at all
    pub name: Option<String>,
    pub path: Option<PathBuf>,
    #[serde(serialize_with = "display_string")]
    pub reason: IoError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryNode {
    pub path: PathBuf,
    pub children: Vec<Entry>,
    pub degraded: Vec<DegradedEntry>,
}

impl DirectoryNode {
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.children.iter().find(|e| e.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

fn display_string<S: Serializer>(err: &IoError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(err)
}

/// Builds [`DirectoryNode`] snapshots, one level at a time
#[derive(Clone)]
pub struct DirectoryLister {
    fs: Arc<dyn FileSystem>,
    directories_first: bool,
}

impl DirectoryLister {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            directories_first: false,
        }
    }

    /// Group directories ahead of files (each group still sorted by name).
    pub fn directories_first(mut self, enabled: bool) -> Self {
        self.directories_first = enabled;
        self
    }

    pub fn list(&self, path: &Path) -> Result<DirectoryNode, IoError> {
        match self.fs.metadata(path) {
            Ok(kind) if kind.is_dir() => {}
            Ok(_) => return Err(IoError::NotADirectory(path.to_path_buf())),
            Err(e) => return Err(IoError::from_io(path, &e)),
        }

        let raw = self
            .fs
            .read_dir(path)
            .map_err(|e| IoError::from_io(path, &e))?;

        let mut children = Vec::with_capacity(raw.len());
        let mut degraded = Vec::new();

        for item in raw {
            let classified = match item {
                Ok(raw_entry) => self.classify(raw_entry),
                Err(e) => Err(DegradedEntry {
                    name: None,
                    path: None,
                    reason: IoError::from_io(path, &e),
                }),
            };

            match classified {
                Ok(entry) => children.push(entry),
                // a listing cut short by the deadline is not a degraded listing
                Err(bad) if matches!(bad.reason, IoError::Timeout(_)) => return Err(bad.reason),
                Err(bad) => {
                    warn!(
                        "listing {}: skipping {}: {}",
                        path.display(),
                        bad.name.as_deref().unwrap_or("<unreadable>"),
                        bad.reason
                    );
                    degraded.push(bad);
                }
            }
        }

        if self.directories_first {
            children.sort_by(|a, b| b.is_dir().cmp(&a.is_dir()).then_with(|| a.name.cmp(&b.name)));
        } else {
            children.sort_by(|a, b| a.name.cmp(&b.name));
        }
        degraded.sort_by(|a, b| a.name.cmp(&b.name));

        debug!(
            "listed {}: {} entries, {} degraded",
            path.display(),
            children.len(),
            degraded.len()
        );

        Ok(DirectoryNode {
            path: path.to_path_buf(),
            children,
            degraded,
        })
    }

    fn classify(&self, raw: RawEntry) -> Result<Entry, DegradedEntry> {
        let name = match raw.name.into_string() {
            Ok(name) => name,
            Err(os_name) => {
                let lossy = os_name.to_string_lossy().into_owned();
                return Err(DegradedEntry {
                    name: Some(lossy.clone()),
                    path: Some(raw.path),
                    reason: IoError::InvalidName(lossy),
                });
            }
        };

        let kind = match self.fs.metadata(&raw.path) {
            Ok(FileKind::Directory) => EntryKind::Directory,
            Ok(_) => EntryKind::File,
            // a dangling symlink can still be unlinked like a file
            Err(e) => match self.fs.symlink_metadata(&raw.path) {
                Ok(FileKind::Symlink) => EntryKind::File,
                _ => {
                    return Err(DegradedEntry {
                        reason: IoError::from_io(&raw.path, &e),
                        name: Some(name),
                        path: Some(raw.path),
                    })
                }
            },
        };

        Ok(Entry {
            name,
            kind,
            path: raw.path,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use explorer_host::HostFileSystem;

    use super::*;
    use crate::testing::FaultyFileSystem;

    fn lister() -> DirectoryLister {
        DirectoryLister::new(Arc::new(HostFileSystem::new()))
    }

    #[test]
    fn test_list_matches_directory_contents() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), b"").unwrap();
        fs::write(dir.path().join("a.txt"), b"").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let node = lister().list(dir.path()).unwrap();
        assert_eq!(node.path, dir.path());
        assert_eq!(node.names().collect::<Vec<_>>(), vec!["a.txt", "b.txt", "sub"]);
        assert_eq!(node.get("sub").unwrap().kind, EntryKind::Directory);
        assert_eq!(node.get("a.txt").unwrap().kind, EntryKind::File);
        assert_eq!(node.get("a.txt").unwrap().path, dir.path().join("a.txt"));
        assert!(node.degraded.is_empty());
    }

    #[test]
    fn test_list_is_one_level_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sub").join("deep")).unwrap();
        fs::write(dir.path().join("sub").join("inner.txt"), b"").unwrap();

        let node = lister().list(dir.path()).unwrap();
        assert_eq!(node.names().collect::<Vec<_>>(), vec!["sub"]);
    }

    #[test]
    fn test_directories_first_ordering() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"").unwrap();
        fs::create_dir(dir.path().join("z")).unwrap();
        fs::create_dir(dir.path().join("m")).unwrap();

        let node = lister().directories_first(true).list(dir.path()).unwrap();
        assert_eq!(node.names().collect::<Vec<_>>(), vec!["m", "z", "a.txt"]);
    }

    #[test]
    fn test_list_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");
        assert_eq!(lister().list(&missing), Err(IoError::NotFound(missing)));
    }

    #[test]
    fn test_list_file_is_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f");
        fs::write(&file, b"").unwrap();
        assert_eq!(lister().list(&file), Err(IoError::NotADirectory(file)));
    }

    #[test]
    fn test_unreadable_directory_is_permission_denied() {
        let dir = tempfile::tempdir().unwrap();
        let fs = FaultyFileSystem::new().deny_read(dir.path());
        let err = DirectoryLister::new(Arc::new(fs)).list(dir.path()).unwrap_err();
        assert_eq!(err, IoError::PermissionDenied(dir.path().to_path_buf()));
    }

    #[test]
    fn test_unreadable_child_is_degraded_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ok.txt"), b"").unwrap();
        fs::create_dir(dir.path().join("locked")).unwrap();

        let fs = FaultyFileSystem::new().deny_stat(dir.path().join("locked"));
        let node = DirectoryLister::new(Arc::new(fs)).list(dir.path()).unwrap();

        assert_eq!(node.names().collect::<Vec<_>>(), vec!["ok.txt"]);
        assert_eq!(node.degraded.len(), 1);
        assert_eq!(node.degraded[0].name.as_deref(), Some("locked"));
        assert_eq!(
            node.degraded[0].reason,
            IoError::PermissionDenied(dir.path().join("locked"))
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_classified_by_target() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("target")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("target"), dir.path().join("to_dir")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("nowhere"), dir.path().join("dangling")).unwrap();

        let node = lister().list(dir.path()).unwrap();
        assert_eq!(node.get("to_dir").unwrap().kind, EntryKind::Directory);
        assert_eq!(node.get("dangling").unwrap().kind, EntryKind::File);
        assert!(node.degraded.is_empty());
    }

    #[test]
    fn test_degraded_entry_serializes_reason_as_text() {
        let bad = DegradedEntry {
            name: Some("x".to_string()),
            path: Some(PathBuf::from("/r/x")),
            reason: IoError::PermissionDenied(PathBuf::from("/r/x")),
        };
        let json = serde_json::to_value(&bad).unwrap();
        assert_eq!(json["reason"], "permission denied: /r/x");
    }
}
