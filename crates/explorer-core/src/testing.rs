// Fault injection over the host filesystem for tests

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use explorer_host::HostFileSystem;
use explorer_platform::filesystem::{FileKind, FileSystem, RawEntry};

#[derive(Default)]
pub struct FaultyFileSystem {
    inner: HostFileSystem,
    deny_read: HashSet<PathBuf>,
    deny_stat: HashSet<PathBuf>,
    deny_remove: HashSet<PathBuf>,
    delay: Option<Duration>,
}

fn denied() -> io::Error {
    io::Error::from(io::ErrorKind::PermissionDenied)
}

impl FaultyFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deny_read(mut self, path: impl AsRef<Path>) -> Self {
        self.deny_read.insert(path.as_ref().to_path_buf());
        self
    }

    pub fn deny_stat(mut self, path: impl AsRef<Path>) -> Self {
        self.deny_stat.insert(path.as_ref().to_path_buf());
        self
    }

    pub fn deny_remove(mut self, path: impl AsRef<Path>) -> Self {
        self.deny_remove.insert(path.as_ref().to_path_buf());
        self
    }

    /// Sleep before every directory read
    pub fn slow_reads(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl FileSystem for FaultyFileSystem {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<io::Result<RawEntry>>> {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        if self.deny_read.contains(path) {
            return Err(denied());
        }
        self.inner.read_dir(path)
    }

    fn metadata(&self, path: &Path) -> io::Result<FileKind> {
        if self.deny_stat.contains(path) {
            return Err(denied());
        }
        self.inner.metadata(path)
    }

    fn symlink_metadata(&self, path: &Path) -> io::Result<FileKind> {
        if self.deny_stat.contains(path) {
            return Err(denied());
        }
        self.inner.symlink_metadata(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        if self.deny_stat.contains(path) {
            return Err(denied());
        }
        self.inner.canonicalize(path)
    }

    fn create_file(&self, path: &Path) -> io::Result<()> {
        self.inner.create_file(path)
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        self.inner.create_dir(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        if self.deny_remove.contains(path) {
            return Err(denied());
        }
        self.inner.remove_file(path)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        if self.deny_remove.contains(path) {
            return Err(denied());
        }
        self.inner.remove_dir(path)
    }
}
