//! Navigation controller: ties listing, history, tree state and mutations
//! together and enforces the transitions between them.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use explorer_platform::filesystem::{FileKind, FileSystem};
use serde::Serialize;
use tracing::{info, warn};

use crate::deadline::{Deadline, DeadlineFileSystem};
use crate::error::{IoError, MutationError};
use crate::history::NavigationHistory;
use crate::listing::{DirectoryLister, DirectoryNode};
use crate::mutation::MutationEngine;
use crate::names;
use crate::tree::TreeState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenOutcome {
    EnteredDirectory(PathBuf),
    /// The entry is a file; viewing it is up to the caller
    FileToView(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackOutcome {
    NewDirectory(PathBuf),
    NoHistory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    File(PathBuf),
    Directory { path: PathBuf, deleted_count: usize },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NavigatorOptions {
    /// 0 = unbounded
    pub history_limit: usize,
    pub directories_first: bool,
}

/// One browsing session rooted at a fixed directory.
///
/// All operations take `&mut self`; serializing concurrent callers is the
/// job of [`crate::service::ExplorerService`].
pub struct Navigator {
    root: PathBuf,
    fs: Arc<dyn FileSystem>,
    tree: TreeState,
    history: NavigationHistory,
    mutations: MutationEngine,
    deadline: Deadline,
}

impl Navigator {
    /// Start a session at `root`. The root is resolved to its canonical form;
    /// nothing outside it can be entered or listed.
    pub fn new(
        fs: Arc<dyn FileSystem>,
        root: PathBuf,
        options: NavigatorOptions,
    ) -> Result<Self, IoError> {
        let deadline = Deadline::new();
        let fs: Arc<dyn FileSystem> = Arc::new(DeadlineFileSystem::new(fs, deadline.clone()));
        let root = fs
            .canonicalize(&root)
            .map_err(|e| IoError::from_io(&root, &e))?;

        let lister = DirectoryLister::new(fs.clone()).directories_first(options.directories_first);
        let tree = TreeState::new(lister, root.clone())?;

        Ok(Self {
            root,
            mutations: MutationEngine::new(fs.clone()),
            fs,
            tree,
            history: NavigationHistory::with_limit(options.history_limit),
            deadline,
        })
    }

    /// Bound every filesystem call made from now on. Calls that would start
    /// after `at` fail with `Timeout`; `None` lifts the bound.
    pub fn set_deadline(&self, at: Option<Instant>) {
        self.deadline.set(at);
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn current(&self) -> &Path {
        self.tree.current()
    }

    pub fn snapshot(&self) -> &DirectoryNode {
        self.tree.snapshot()
    }

    pub fn history_depth(&self) -> usize {
        self.history.len()
    }

    pub fn is_at_root(&self) -> bool {
        self.current() == self.root && self.history.is_empty()
    }

    /// List any directory inside the root without moving there. Relative
    /// paths are resolved against the current directory.
    pub fn list_directory(&self, path: &Path) -> Result<DirectoryNode, IoError> {
        let path = self.resolve_within_root(path)?;
        self.ensure_inside_root(&path)?;
        self.tree.lister().list(&path)
    }

    pub fn open(&mut self, name: &str) -> Result<OpenOutcome, IoError> {
        let path = names::child_path(self.current(), name)
            .map_err(|_| IoError::InvalidName(name.to_string()))?;
        self.ensure_inside_root(&path)?;

        let kind = self
            .fs
            .metadata(&path)
            .map_err(|e| IoError::from_io(&path, &e))?;
        if kind != FileKind::Directory {
            info!("open requested for file {}", path.display());
            return Ok(OpenOutcome::FileToView(path));
        }

        let previous = self.current().to_path_buf();
        self.tree.set_current(path.clone())?;
        // pushed only once the move succeeded, so history never holds the current directory
        self.history.push(previous);
        info!("entered {}", path.display());
        Ok(OpenOutcome::EnteredDirectory(path))
    }

    /// Return to the previously visited directory. A history entry that no
    /// longer exists is discarded and its error returned.
    pub fn back(&mut self) -> Result<BackOutcome, IoError> {
        let Some(previous) = self.history.pop() else {
            info!("no previous directory");
            return Ok(BackOutcome::NoHistory);
        };

        if let Err(e) = self.tree.set_current(previous.clone()) {
            self.drop_history_at_current();
            return Err(e);
        }
        info!("back to {}", previous.display());
        Ok(BackOutcome::NewDirectory(previous))
    }

    /// Rebuild the snapshot. If the current directory has disappeared, move to
    /// its nearest surviving ancestor inside the root.
    pub fn refresh(&mut self) -> Result<DirectoryNode, IoError> {
        let err = match self.tree.invalidate() {
            Ok(snapshot) => return Ok(snapshot.clone()),
            Err(e) => e,
        };
        if err.is_vanished() {
            self.relocate(err)
        } else {
            Err(err)
        }
    }

    pub fn create_file(&mut self, name: &str) -> Result<PathBuf, MutationError> {
        let created = self.mutations.create_file(self.tree.current(), name)?;
        self.refresh_after_mutation();
        Ok(created)
    }

    pub fn create_directory(&mut self, name: &str) -> Result<PathBuf, MutationError> {
        let created = self.mutations.create_directory(self.tree.current(), name)?;
        self.refresh_after_mutation();
        Ok(created)
    }

    pub fn delete_file(&mut self, name: &str) -> Result<PathBuf, MutationError> {
        let path = self.mutation_target(name)?;
        let deleted = self.mutations.delete_file(&path)?;
        self.refresh_after_mutation();
        Ok(deleted)
    }

    pub fn delete_directory(&mut self, name: &str) -> Result<usize, MutationError> {
        let path = self.mutation_target(name)?;
        let result = self.mutations.delete_directory(&path);
        if matches!(
            result,
            Ok(_) | Err(MutationError::PartialDeleteFailure { .. })
        ) {
            self.refresh_after_mutation();
        }
        result
    }

    /// Delete `name` whatever it is, routing on the entry's own kind
    /// (symlinks are treated as files).
    pub fn delete(&mut self, name: &str) -> Result<DeleteOutcome, MutationError> {
        let path = self.mutation_target(name)?;
        let kind = self
            .fs
            .symlink_metadata(&path)
            .map_err(|e| MutationError::from_io(&path, &e))?;

        if kind == FileKind::Directory {
            let deleted_count = self.delete_directory(name)?;
            Ok(DeleteOutcome::Directory {
                path,
                deleted_count,
            })
        } else {
            self.delete_file(name).map(DeleteOutcome::File)
        }
    }

    fn mutation_target(&self, name: &str) -> Result<PathBuf, MutationError> {
        names::child_path(self.current(), name)
            .map_err(|_| MutationError::InvalidName(name.to_string()))
    }

    fn refresh_after_mutation(&mut self) {
        if let Err(e) = self.refresh() {
            warn!("refresh after mutation failed: {}", e);
        }
    }

    fn relocate(&mut self, cause: IoError) -> Result<DirectoryNode, IoError> {
        let stale = self.current().to_path_buf();
        warn!("{} is gone: {}", stale.display(), cause);

        let candidates: Vec<PathBuf> = stale
            .ancestors()
            .skip(1)
            .take_while(|p| p.starts_with(&self.root))
            .map(Path::to_path_buf)
            .collect();

        for candidate in candidates {
            if self.tree.set_current(candidate.clone()).is_ok() {
                self.drop_history_at_current();
                info!("relocated from {} to {}", stale.display(), candidate.display());
                return Ok(self.tree.snapshot().clone());
            }
        }

        Err(cause)
    }

    /// Keep the history invariant after the stack changed without a move:
    /// the top entry is never the current directory.
    fn drop_history_at_current(&mut self) {
        while self.history.peek() == Some(self.tree.current()) {
            self.history.pop();
        }
    }

    /// Reject paths whose symlink-resolved location lies outside the root.
    fn ensure_inside_root(&self, path: &Path) -> Result<(), IoError> {
        let real = self
            .fs
            .canonicalize(path)
            .map_err(|e| IoError::from_io(path, &e))?;
        if real.starts_with(&self.root) {
            Ok(())
        } else {
            warn!("{} resolves outside the root to {}", path.display(), real.display());
            Err(IoError::PermissionDenied(path.to_path_buf()))
        }
    }

    fn resolve_within_root(&self, path: &Path) -> Result<PathBuf, IoError> {
        let joined = self.current().join(path);
        let mut normalized = PathBuf::new();
        for component in joined.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    normalized.pop();
                }
                other => normalized.push(other),
            }
        }

        if normalized.starts_with(&self.root) {
            Ok(normalized)
        } else {
            Err(IoError::PermissionDenied(normalized))
        }
    }
}
