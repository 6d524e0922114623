use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use explorer_platform::filesystem::{FileKind, FileSystem, RawEntry};

#[derive(Debug, Default, Clone, Copy)]
pub struct HostFileSystem;

impl HostFileSystem {
    pub fn new() -> Self {
        Self
    }

    fn kind_of(file_type: fs::FileType) -> FileKind {
        if file_type.is_symlink() {
            FileKind::Symlink
        } else if file_type.is_dir() {
            FileKind::Directory
        } else if file_type.is_file() {
            FileKind::File
        } else {
            FileKind::Other
        }
    }
}

impl FileSystem for HostFileSystem {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<io::Result<RawEntry>>> {
        let entries = fs::read_dir(path)?;

        Ok(entries
            .map(|entry| {
                entry.map(|e| RawEntry {
                    name: e.file_name(),
                    path: e.path(),
                })
            })
            .collect())
    }

    fn metadata(&self, path: &Path) -> io::Result<FileKind> {
        fs::metadata(path).map(|meta| Self::kind_of(meta.file_type()))
    }

    fn symlink_metadata(&self, path: &Path) -> io::Result<FileKind> {
        fs::symlink_metadata(path).map(|meta| Self::kind_of(meta.file_type()))
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        fs::canonicalize(path)
    }

    fn create_file(&self, path: &Path) -> io::Result<()> {
        // create_new fails with AlreadyExists rather than truncating
        OpenOptions::new().write(true).create_new(true).open(path)?;
        tracing::debug!("created file {}", path.display());
        Ok(())
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir(path)?;
        tracing::debug!("created directory {}", path.display());
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir(path)
    }
}
