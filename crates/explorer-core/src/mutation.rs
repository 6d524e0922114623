//! Create and delete operations against the filesystem.
//!
//! Operations are kind-specific: callers decide between [`MutationEngine::delete_file`]
//! and [`MutationEngine::delete_directory`] before calling.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use explorer_platform::filesystem::{FileKind, FileSystem};
use tracing::{debug, info, warn};

use crate::error::{IoError, MutationError};
use crate::names;

/// Where a recursive delete stopped
struct DeleteHalt {
    path: PathBuf,
    reason: IoError,
}

impl DeleteHalt {
    fn new(path: &Path, err: &std::io::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            reason: IoError::from_io(path, err),
        }
    }
}

#[derive(Clone)]
pub struct MutationEngine {
    fs: Arc<dyn FileSystem>,
}

impl MutationEngine {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Create an empty file named `name` inside `dir`.
    pub fn create_file(&self, dir: &Path, name: &str) -> Result<PathBuf, MutationError> {
        let path = Self::target(dir, name)?;
        self.fs
            .create_file(&path)
            .map_err(|e| MutationError::from_io(&path, &e))?;
        info!("created file {}", path.display());
        Ok(path)
    }

    /// Create directory `name` inside `dir`. Only one level is created.
    pub fn create_directory(&self, dir: &Path, name: &str) -> Result<PathBuf, MutationError> {
        let path = Self::target(dir, name)?;
        self.fs
            .create_dir(&path)
            .map_err(|e| MutationError::from_io(&path, &e))?;
        info!("created directory {}", path.display());
        Ok(path)
    }

    /// Remove a single non-directory entry. Symlinks are removed, never followed.
    pub fn delete_file(&self, path: &Path) -> Result<PathBuf, MutationError> {
        if self.kind_of(path)? == FileKind::Directory {
            return Err(MutationError::IsADirectory(path.to_path_buf()));
        }
        self.fs
            .remove_file(path)
            .map_err(|e| MutationError::from_io(path, &e))?;
        info!("deleted file {}", path.display());
        Ok(path.to_path_buf())
    }

    /// Remove `path` and everything beneath it, children before parents.
    ///
    /// Stops at the first failure without rolling back. The error carries the
    /// failing path and how many entries were already removed. Symlinks inside
    /// the tree are unlinked, not descended into.
    pub fn delete_directory(&self, path: &Path) -> Result<usize, MutationError> {
        if self.kind_of(path)? != FileKind::Directory {
            return Err(MutationError::NotADirectory(path.to_path_buf()));
        }

        let mut deleted = 0;
        match self.remove_tree(path, &mut deleted) {
            Ok(()) => {
                info!("deleted directory {} ({} entries)", path.display(), deleted);
                Ok(deleted)
            }
            Err(halt) => {
                warn!(
                    "delete of {} stopped at {} after {} entries: {}",
                    path.display(),
                    halt.path.display(),
                    deleted,
                    halt.reason
                );
                Err(MutationError::PartialDeleteFailure {
                    first_failure: halt.path,
                    deleted_count: deleted,
                    reason: halt.reason,
                })
            }
        }
    }

    fn remove_tree(&self, dir: &Path, deleted: &mut usize) -> Result<(), DeleteHalt> {
        let mut children = Vec::new();
        for item in self.fs.read_dir(dir).map_err(|e| DeleteHalt::new(dir, &e))? {
            children.push(item.map_err(|e| DeleteHalt::new(dir, &e))?);
        }
        children.sort_by(|a, b| a.name.cmp(&b.name));

        for child in children {
            let kind = self
                .fs
                .symlink_metadata(&child.path)
                .map_err(|e| DeleteHalt::new(&child.path, &e))?;

            if kind == FileKind::Directory {
                self.remove_tree(&child.path, deleted)?;
            } else {
                self.fs
                    .remove_file(&child.path)
                    .map_err(|e| DeleteHalt::new(&child.path, &e))?;
                *deleted += 1;
                debug!("removed {}", child.path.display());
            }
        }

        self.fs
            .remove_dir(dir)
            .map_err(|e| DeleteHalt::new(dir, &e))?;
        *deleted += 1;
        debug!("removed {}", dir.display());
        Ok(())
    }

    fn kind_of(&self, path: &Path) -> Result<FileKind, MutationError> {
        self.fs
            .symlink_metadata(path)
            .map_err(|e| MutationError::from_io(path, &e))
    }

    fn target(dir: &Path, name: &str) -> Result<PathBuf, MutationError> {
        names::child_path(dir, name).map_err(|_| MutationError::InvalidName(name.to_string()))
    }
}
