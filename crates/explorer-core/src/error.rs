//! Typed failures returned by the explorer core.
//!
//! Filesystem failures are classified into [`IoError`], mutation outcomes into
//! [`MutationError`], and startup validation into [`ConfigError`]. [`Error`]
//! is the union handed out by the async service.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IoError {
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("timed out: {}", .0.display())]
    Timeout(PathBuf),

    /// Name cannot address a child of the current directory
    #[error("invalid entry name: {0:?}")]
    InvalidName(String),

    #[error("i/o error on {}: {message}", .path.display())]
    Other { path: PathBuf, message: String },
}

impl IoError {
    /// Classify a raw `io::Error` raised while operating on `path`.
    pub fn from_io(path: &Path, err: &io::Error) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound => IoError::NotFound(path),
            io::ErrorKind::PermissionDenied => IoError::PermissionDenied(path),
            io::ErrorKind::NotADirectory => IoError::NotADirectory(path),
            io::ErrorKind::TimedOut => IoError::Timeout(path),
            _ => IoError::Other {
                path,
                message: err.to_string(),
            },
        }
    }

    /// Short machine-readable tag, used in protocol responses.
    pub fn kind(&self) -> &'static str {
        match self {
            IoError::NotFound(_) => "not_found",
            IoError::NotADirectory(_) => "not_a_directory",
            IoError::PermissionDenied(_) => "permission_denied",
            IoError::Timeout(_) => "timeout",
            IoError::InvalidName(_) => "invalid_name",
            IoError::Other { .. } => "io",
        }
    }

    /// True when the error means the path is gone or is no longer a directory.
    pub fn is_vanished(&self) -> bool {
        matches!(self, IoError::NotFound(_) | IoError::NotADirectory(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    #[error("already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("invalid name: {0:?}")]
    InvalidName(String),

    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("is a directory: {}", .0.display())]
    IsADirectory(PathBuf),

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// Recursive delete stopped at `first_failure`; nothing was rolled back
    #[error(
        "delete stopped at {} after removing {deleted_count} entries: {reason}",
        .first_failure.display()
    )]
    PartialDeleteFailure {
        first_failure: PathBuf,
        deleted_count: usize,
        reason: IoError,
    },

    #[error(transparent)]
    Io(#[from] IoError),
}

impl MutationError {
    /// Classify an `io::Error` from a create/remove call on `path`.
    pub fn from_io(path: &Path, err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::AlreadyExists => MutationError::AlreadyExists(path.to_path_buf()),
            io::ErrorKind::NotFound => MutationError::NotFound(path.to_path_buf()),
            io::ErrorKind::IsADirectory => MutationError::IsADirectory(path.to_path_buf()),
            io::ErrorKind::NotADirectory => MutationError::NotADirectory(path.to_path_buf()),
            _ => MutationError::Io(IoError::from_io(path, err)),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            MutationError::AlreadyExists(_) => "already_exists",
            MutationError::InvalidName(_) => "invalid_name",
            MutationError::NotFound(_) => "not_found",
            MutationError::IsADirectory(_) => "is_a_directory",
            MutationError::NotADirectory(_) => "not_a_directory",
            MutationError::PartialDeleteFailure { .. } => "partial_delete_failure",
            MutationError::Io(e) => e.kind(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("root directory not found: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("root is not a directory: {}", .0.display())]
    RootNotADirectory(PathBuf),

    #[error("cannot list root: {0}")]
    RootUnreadable(IoError),

    #[error("cannot access root {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Any failure surfaced by [`crate::service::ExplorerService`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Mutation(#[from] MutationError),
}

impl Error {
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Io(e) => e.kind(),
            Error::Mutation(e) => e.kind(),
        }
    }

    /// True when the request was stopped by its deadline, including a
    /// recursive delete halted part way.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Error::Io(IoError::Timeout(_))
                | Error::Mutation(MutationError::Io(IoError::Timeout(_)))
                | Error::Mutation(MutationError::PartialDeleteFailure {
                    reason: IoError::Timeout(_),
                    ..
                })
        )
    }
}
