//! Per-request deadline enforced at filesystem call boundaries.
//!
//! Every call made through [`DeadlineFileSystem`] first checks the shared
//! [`Deadline`]. A call that would start after it fails with
//! `io::ErrorKind::TimedOut`, so an operation stops at the next boundary and
//! reports how far it got instead of running on unobserved.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use explorer_platform::filesystem::{FileKind, FileSystem, RawEntry};

/// Shared, settable deadline. `None` means unbounded.
#[derive(Debug, Clone, Default)]
pub struct Deadline {
    at: Arc<Mutex<Option<Instant>>>,
}

impl Deadline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, at: Option<Instant>) {
        *self.at.lock().unwrap_or_else(|e| e.into_inner()) = at;
    }

    pub fn get(&self) -> Option<Instant> {
        *self.at.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check(&self, path: &Path) -> io::Result<()> {
        match self.get() {
            Some(at) if Instant::now() >= at => Err(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("deadline passed before accessing {}", path.display()),
            )),
            _ => Ok(()),
        }
    }
}

pub struct DeadlineFileSystem {
    inner: Arc<dyn FileSystem>,
    deadline: Deadline,
}

impl DeadlineFileSystem {
    pub fn new(inner: Arc<dyn FileSystem>, deadline: Deadline) -> Self {
        Self { inner, deadline }
    }
}

impl FileSystem for DeadlineFileSystem {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<io::Result<RawEntry>>> {
        self.deadline.check(path)?;
        self.inner.read_dir(path)
    }

    fn metadata(&self, path: &Path) -> io::Result<FileKind> {
        self.deadline.check(path)?;
        self.inner.metadata(path)
    }

    fn symlink_metadata(&self, path: &Path) -> io::Result<FileKind> {
        self.deadline.check(path)?;
        self.inner.symlink_metadata(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        self.deadline.check(path)?;
        self.inner.canonicalize(path)
    }

    fn create_file(&self, path: &Path) -> io::Result<()> {
        self.deadline.check(path)?;
        self.inner.create_file(path)
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        self.deadline.check(path)?;
        self.inner.create_dir(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        self.deadline.check(path)?;
        self.inner.remove_file(path)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        self.deadline.check(path)?;
        self.inner.remove_dir(path)
    }
}
