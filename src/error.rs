//! Error types for cmdim.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the config store and the API client.
#[derive(Error, Debug)]
pub enum CmdimError {
    /// No config file, or the file holds no URL.
    #[error("no PocketBase Instance URL configured (expected in {})", .path.display())]
    NotConfigured { path: PathBuf },

    /// Local file read/write error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file given to `--upload` does not exist.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Network-level failure (connect, DNS, body read).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The configured URL cannot be split into scheme and host.
    #[error("invalid instance URL: {0}")]
    InvalidUrl(String),

    /// The probe GET did not answer 200.
    #[error("PocketBase Instance is not running at: {url} (status {status})")]
    Unreachable { url: String, status: u16 },

    /// A non-success status where no more specific variant applies.
    #[error("unexpected status {code}: {body}")]
    UnexpectedStatus { code: u16, body: String },

    #[error("upload failed with status {status}: {body}")]
    UploadRejected { status: u16, body: String },

    /// JSON body missing expected fields or not JSON at all.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The file was uploaded but writing the derived link back failed.
    #[error("update failed with status to update link in db: {status}")]
    LinkPersistFailed { status: u16 },

    #[error("delete failed with status: {status}")]
    DeleteFailed { status: u16 },
}

impl CmdimError {
    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            CmdimError::Unreachable { status, .. }
            | CmdimError::UploadRejected { status, .. }
            | CmdimError::LinkPersistFailed { status }
            | CmdimError::DeleteFailed { status } => Some(*status),
            CmdimError::UnexpectedStatus { code, .. } => Some(*code),
            CmdimError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, CmdimError>;
