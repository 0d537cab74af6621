//! Error types for the photo frame client.
//!
//! Every public operation returns [`FrameError`]. Callers that only care
//! about the broad category can match on the variant; the recursive folder
//! delete wraps whatever stopped it in [`FrameError::FolderDelete`] so the
//! caller learns where the walk aborted and how much was already removed.

use thiserror::Error;

/// Top-level error type for device operations.
#[derive(Error, Debug)]
pub enum FrameError {
    /// A network, connection, timeout, or local read/write failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The device answered with a non-success HTTP status.
    #[error("Device returned HTTP {status} for {path}")]
    Status { status: u16, path: String },

    /// A path that must exist before the request was not found on the device.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A folder listing could not be parsed.
    #[error("Listing parse error: {0}")]
    Parse(String),

    /// Fetched bytes could not be decoded as an image.
    #[error("Image decode error: {0}")]
    Decode(String),

    /// The client configuration is invalid or unreadable.
    #[error("Config error: {0}")]
    Config(String),

    /// A recursive folder delete stopped partway through.
    ///
    /// `deleted` counts the files and folders already removed before the
    /// failure. They are not restored.
    #[error("Folder delete aborted in {path} after {deleted} removals: {source}")]
    FolderDelete {
        path: String,
        deleted: usize,
        #[source]
        source: Box<FrameError>,
    },
}

impl FrameError {
    /// Whether this error reports a missing path, either from the proactive
    /// existence check or from a 404 answered by the device.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Status { status, .. } => *status == 404,
            Self::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            Self::FolderDelete { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// The innermost cause, looking through [`FrameError::FolderDelete`].
    pub fn root_cause(&self) -> &FrameError {
        match self {
            Self::FolderDelete { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
