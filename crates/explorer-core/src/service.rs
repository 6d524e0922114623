//! Serialized, time-bounded access to a [`Navigator`].
//!
//! Requests queue on a single lock. Once a request holds the lock its
//! filesystem work runs on the blocking pool under a deadline derived from the
//! configured timeout. The deadline is checked before every filesystem call,
//! so a slow request stops at the next call and reports what it managed;
//! the service always waits for it and returns that report.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use explorer_platform::filesystem::FileSystem;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::ExplorerConfig;
use crate::error::{ConfigError, Error, IoError};
use crate::listing::DirectoryNode;
use crate::navigator::{BackOutcome, DeleteOutcome, Navigator, OpenOutcome};

/// Point-in-time view of a session
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub session_id: Uuid,
    pub root: PathBuf,
    pub current: PathBuf,
    pub history_depth: usize,
    pub at_root: bool,
    pub snapshot: DirectoryNode,
}

#[derive(Clone)]
pub struct ExplorerService {
    id: Uuid,
    navigator: Arc<Mutex<Navigator>>,
    timeout: Option<Duration>,
}

impl ExplorerService {
    pub fn new(navigator: Navigator, timeout: Option<Duration>) -> Self {
        let id = Uuid::new_v4();
        info!(
            "session {} started at {} (timeout={:?})",
            id,
            navigator.root().display(),
            timeout
        );
        Self {
            id,
            navigator: Arc::new(Mutex::new(navigator)),
            timeout,
        }
    }

    /// Validate the configured root and open a session on it.
    pub fn start(config: &ExplorerConfig, fs: Arc<dyn FileSystem>) -> Result<Self, ConfigError> {
        let root = config.validate()?;
        let navigator = Navigator::new(fs, root.clone(), config.navigator_options())
            .map_err(|e| match e {
                IoError::NotFound(_) => ConfigError::RootNotFound(root),
                IoError::NotADirectory(_) => ConfigError::RootNotADirectory(root),
                other => ConfigError::RootUnreadable(other),
            })?;
        Ok(Self::new(navigator, config.fs_timeout()))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub async fn list_directory(&self, path: PathBuf) -> Result<DirectoryNode, Error> {
        self.run(move |nav| nav.list_directory(&path)).await
    }

    pub async fn open(&self, name: String) -> Result<OpenOutcome, Error> {
        self.run(move |nav| nav.open(&name)).await
    }

    pub async fn back(&self) -> Result<BackOutcome, Error> {
        self.run(|nav| nav.back()).await
    }

    pub async fn refresh(&self) -> Result<DirectoryNode, Error> {
        self.run(|nav| nav.refresh()).await
    }

    pub async fn create_file(&self, name: String) -> Result<PathBuf, Error> {
        self.run(move |nav| nav.create_file(&name)).await
    }

    pub async fn create_directory(&self, name: String) -> Result<PathBuf, Error> {
        self.run(move |nav| nav.create_directory(&name)).await
    }

    pub async fn delete_file(&self, name: String) -> Result<PathBuf, Error> {
        self.run(move |nav| nav.delete_file(&name)).await
    }

    pub async fn delete_directory(&self, name: String) -> Result<DeleteOutcome, Error> {
        self.run(move |nav| {
            let path = nav.current().join(&name);
            nav.delete_directory(&name)
                .map(|deleted_count| DeleteOutcome::Directory {
                    path,
                    deleted_count,
                })
        })
        .await
    }

    pub async fn delete(&self, name: String) -> Result<DeleteOutcome, Error> {
        self.run(move |nav| nav.delete(&name)).await
    }

    pub async fn status(&self) -> Result<SessionStatus, Error> {
        let id = self.id;
        self.run(move |nav| {
            Ok::<_, Error>(SessionStatus {
                session_id: id,
                root: nav.root().to_path_buf(),
                current: nav.current().to_path_buf(),
                history_depth: nav.history_depth(),
                at_root: nav.is_at_root(),
                snapshot: nav.snapshot().clone(),
            })
        })
        .await
    }

    async fn run<T, E, F>(&self, op: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Navigator) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Into<Error> + Send + 'static,
    {
        let mut guard = self.navigator.clone().lock_owned().await;
        let current = guard.current().to_path_buf();
        let limit = self.timeout;

        let task = tokio::task::spawn_blocking(move || {
            guard.set_deadline(limit.map(|t| Instant::now() + t));
            let result = op(&mut *guard);
            guard.set_deadline(None);
            result.map_err(Into::into)
        });

        let result = task.await.map_err(|e| {
            Error::Io(IoError::Other {
                path: current.clone(),
                message: format!("filesystem worker failed: {e}"),
            })
        })?;

        if let Err(e) = &result {
            if e.is_timeout() {
                warn!(
                    "session {}: request in {} ran past {:?}: {}",
                    self.id,
                    current.display(),
                    limit.unwrap_or_default(),
                    e
                );
            }
        }
        result
    }

    /// Current directory without touching the filesystem
    pub async fn current(&self) -> PathBuf {
        self.navigator.lock().await.current().to_path_buf()
    }
}
