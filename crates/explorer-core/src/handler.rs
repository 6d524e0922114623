use tracing::{debug, info};

use crate::navigator::{BackOutcome, DeleteOutcome, OpenOutcome};
use crate::protocol::{Request, Response};
use crate::service::ExplorerService;

/// Dispatches protocol requests onto an [`ExplorerService`]
pub struct RequestHandler {
    service: ExplorerService,
}

impl RequestHandler {
    pub fn new(service: ExplorerService) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &ExplorerService {
        &self.service
    }

    /// Run one request. Failures come back as [`Response::Error`].
    pub async fn handle(&self, request: Request) -> Response {
        debug!("request: {:?}", request);

        let result = match request {
            Request::List { path } => {
                let path = path.unwrap_or_default();
                self.service
                    .list_directory(path)
                    .await
                    .map(|node| Response::Listing { node })
            }
            Request::Open { name } => {
                info!("open: {}", name);
                self.service.open(name).await.map(|outcome| match outcome {
                    OpenOutcome::EnteredDirectory(path) => Response::EnteredDirectory { path },
                    OpenOutcome::FileToView(path) => Response::FileToView { path },
                })
            }
            Request::Back => self.service.back().await.map(|outcome| match outcome {
                BackOutcome::NewDirectory(path) => Response::NewDirectory { path },
                BackOutcome::NoHistory => Response::NoHistory,
            }),
            Request::Refresh => self
                .service
                .refresh()
                .await
                .map(|node| Response::Listing { node }),
            Request::CreateFile { name } => {
                info!("create file: {}", name);
                self.service
                    .create_file(name)
                    .await
                    .map(|path| Response::Created { path })
            }
            Request::CreateDirectory { name } => {
                info!("create directory: {}", name);
                self.service
                    .create_directory(name)
                    .await
                    .map(|path| Response::Created { path })
            }
            Request::DeleteFile { name } => {
                info!("delete file: {}", name);
                self.service
                    .delete_file(name)
                    .await
                    .map(|path| Response::Deleted { path })
            }
            Request::DeleteDirectory { name } => {
                info!("delete directory: {}", name);
                self.service.delete_directory(name).await.map(deleted)
            }
            Request::Delete { name } => {
                info!("delete: {}", name);
                self.service.delete(name).await.map(deleted)
            }
            Request::Status => self
                .service
                .status()
                .await
                .map(|status| Response::Status { status }),
        };

        result.unwrap_or_else(Response::from)
    }
}

fn deleted(outcome: DeleteOutcome) -> Response {
    match outcome {
        DeleteOutcome::File(path) => Response::Deleted { path },
        DeleteOutcome::Directory {
            path,
            deleted_count,
        } => Response::DeletedCount {
            path,
            deleted_count,
        },
    }
}
