//! JSON request/response shapes exchanged with a presentation layer.
//!
//! One request per JSON object, tagged by `"op"`; responses are tagged by
//! `"result"`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, MutationError};
use crate::listing::DirectoryNode;
use crate::service::SessionStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    /// List a directory without moving; defaults to the current one
    List {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<PathBuf>,
    },
    Open { name: String },
    Back,
    Refresh,
    CreateFile { name: String },
    CreateDirectory { name: String },
    DeleteFile { name: String },
    DeleteDirectory { name: String },
    /// Delete either kind; the controller inspects the entry
    Delete { name: String },
    Status,
}

impl Request {
    pub fn parse_json(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Response {
    Listing {
        node: DirectoryNode,
    },
    EnteredDirectory {
        path: PathBuf,
    },
    FileToView {
        path: PathBuf,
    },
    NewDirectory {
        path: PathBuf,
    },
    NoHistory,
    Created {
        path: PathBuf,
    },
    Deleted {
        path: PathBuf,
    },
    DeletedCount {
        path: PathBuf,
        deleted_count: usize,
    },
    Status {
        status: SessionStatus,
    },
    Error {
        kind: String,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        first_failure: Option<PathBuf>,
        #[serde(skip_serializing_if = "Option::is_none")]
        deleted_count: Option<usize>,
    },
}

impl Response {
    pub fn error(message: impl Into<String>, kind: &str) -> Self {
        Response::Error {
            kind: kind.to_string(),
            message: message.into(),
            first_failure: None,
            deleted_count: None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error { .. })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl From<Error> for Response {
    fn from(err: Error) -> Self {
        let (first_failure, deleted_count) = match &err {
            Error::Mutation(MutationError::PartialDeleteFailure {
                first_failure,
                deleted_count,
                ..
            }) => (Some(first_failure.clone()), Some(*deleted_count)),
            _ => (None, None),
        };

        Response::Error {
            kind: err.kind().to_string(),
            message: err.to_string(),
            first_failure,
            deleted_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IoError;

    #[test]
    fn test_parse_requests() {
        assert_eq!(
            Request::parse_json(r#"{"op":"open","name":"sub"}"#).unwrap(),
            Request::Open {
                name: "sub".to_string()
            }
        );
        assert_eq!(Request::parse_json(r#"{"op":"back"}"#).unwrap(), Request::Back);
        assert_eq!(
            Request::parse_json(r#"{"op":"list"}"#).unwrap(),
            Request::List { path: None }
        );
        assert_eq!(
            Request::parse_json(r#"{"op":"create_directory","name":"d"}"#).unwrap(),
            Request::CreateDirectory {
                name: "d".to_string()
            }
        );
    }

    #[test]
    fn test_parse_rejects_unknown_op() {
        assert!(Request::parse_json(r#"{"op":"format_disk"}"#).is_err());
        assert!(Request::parse_json(r#"{"op":"open"}"#).is_err());
    }

    #[test]
    fn test_no_history_response_shape() {
        let json = Response::NoHistory.to_json().unwrap();
        assert_eq!(json, r#"{"result":"no_history"}"#);
    }

    #[test]
    fn test_partial_delete_response_carries_progress() {
        let err = Error::Mutation(MutationError::PartialDeleteFailure {
            first_failure: PathBuf::from("/r/t/b/c.txt"),
            deleted_count: 2,
            reason: IoError::PermissionDenied(PathBuf::from("/r/t/b/c.txt")),
        });

        let value = serde_json::to_value(Response::from(err)).unwrap();
        assert_eq!(value["result"], "error");
        assert_eq!(value["kind"], "partial_delete_failure");
        assert_eq!(value["first_failure"], "/r/t/b/c.txt");
        assert_eq!(value["deleted_count"], 2);
    }

    #[test]
    fn test_plain_error_omits_progress_fields() {
        let err = Error::Io(IoError::NotFound(PathBuf::from("/r/x")));
        let value = serde_json::to_value(Response::from(err)).unwrap();
        assert_eq!(value["kind"], "not_found");
        assert!(value.get("first_failure").is_none());
        assert!(value.get("deleted_count").is_none());
    }
}
