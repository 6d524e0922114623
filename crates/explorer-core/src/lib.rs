//! Directory navigation and tree-state engine.
//!
//! A [`navigator::Navigator`] tracks the current directory inside a fixed
//! root, keeps a back-history, rebuilds one-level snapshots on demand and runs
//! create/delete mutations. [`service::ExplorerService`] serializes access to
//! it for concurrent callers, and [`handler::RequestHandler`] maps the JSON
//! [`protocol`] onto the service.

pub mod config;
pub mod deadline;
pub mod error;
pub mod handler;
pub mod history;
pub mod listing;
pub mod mutation;
pub mod names;
pub mod navigator;
pub mod protocol;
pub mod service;
pub mod tree;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{ConfigError, Error, IoError, MutationError};
pub use listing::{DirectoryNode, Entry, EntryKind};
pub use navigator::Navigator;
pub use service::ExplorerService;
