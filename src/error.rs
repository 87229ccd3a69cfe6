//! Error types for request handling

use hyper::StatusCode;
use std::io;
use thiserror::Error;

/// Result type alias for request handling
pub type Result<T> = std::result::Result<T, ServeError>;

/// Request-level failures, each mapped to a status code with an empty body
#[derive(Debug, Error)]
pub enum ServeError {
    /// Requested path does not resolve to anything on disk
    #[error("Not found: {0}")]
    NotFound(String),

    /// Path exists but the file could not be opened
    #[error("Forbidden: {path}: {source}")]
    Forbidden {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Path exists but reading it failed (directory enumeration, seek)
    #[error("Server fault: {path}: {source}")]
    ServerFault {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Range start lies past the resolved end
    #[error("Range not satisfiable: {header} (size {size})")]
    RangeNotSatisfiable { header: String, size: u64 },
}

impl ServeError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::ServerFault { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::RangeNotSatisfiable { .. } => StatusCode::RANGE_NOT_SATISFIABLE,
        }
    }
}

/// Whether an error was caused by the peer going away mid-response
///
/// Walks the `source()` chain looking for an I/O error of kind
/// `ConnectionReset`, `BrokenPipe` or `ConnectionAborted`.
pub fn is_benign_disconnect(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            if matches!(
                io_err.kind(),
                io::ErrorKind::ConnectionReset
                    | io::ErrorKind::BrokenPipe
                    | io::ErrorKind::ConnectionAborted
            ) {
                return true;
            }
        }
        current = e.source();
    }
    false
}
