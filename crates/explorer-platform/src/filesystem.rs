use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// What a path points at, as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    File,
    Directory,
    Symlink,
    /// Sockets, FIFOs, device nodes
    Other,
}

impl FileKind {
    pub fn is_dir(self) -> bool {
        matches!(self, FileKind::Directory)
    }
}

/// One raw entry produced while enumerating a directory
#[derive(Debug, Clone)]
pub struct RawEntry {
    pub name: OsString,
    pub path: PathBuf,
}

pub trait FileSystem: Send + Sync {
    /// Enumerate the immediate children of `path`. The outer error means the
    /// directory itself could not be opened; inner errors are per entry.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<io::Result<RawEntry>>>;
    /// Kind of `path`, following symlinks.
    fn metadata(&self, path: &Path) -> io::Result<FileKind>;
    /// Kind of `path` itself, never following symlinks.
    fn symlink_metadata(&self, path: &Path) -> io::Result<FileKind>;
    /// Absolute path with every symlink resolved.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
    /// Create an empty file. Fails with `AlreadyExists` if anything is there.
    fn create_file(&self, path: &Path) -> io::Result<()>;
    /// Create a single directory level; the parent must exist.
    fn create_dir(&self, path: &Path) -> io::Result<()>;
    fn remove_file(&self, path: &Path) -> io::Result<()>;
    /// Remove an empty directory.
    fn remove_dir(&self, path: &Path) -> io::Result<()>;
}
