use std::path::PathBuf;

use rocket::{
    http::Status,
    response::{self, Responder},
    Request,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("path escapes the document root: {0}")]
    Forbidden(String),
    #[error("document not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl DocumentError {
    pub fn status(&self) -> Status {
        match self {
            Self::Forbidden(_) => Status::Forbidden,
            Self::NotFound(_) => Status::NotFound,
            Self::Io { .. } => Status::InternalServerError,
        }
    }

    /// Maps a failed read of `path` onto not-found or a generic I/O failure.
    pub fn from_read(path: PathBuf, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound | std::io::ErrorKind::IsADirectory => {
                Self::NotFound(path)
            }
            _ => Self::Io { path, source },
        }
    }
}

impl<'r> Responder<'r, 'static> for DocumentError {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        match &self {
            Self::Io { .. } => log::error!("{self}"),
            _ => log::debug!("{self}"),
        }

        // The registered catcher renders the page for this status.
        Err(self.status())
    }
}
