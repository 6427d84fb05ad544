//! Error kinds for placement-tree operations

use strum_macros::{Display, IntoStaticStr};

/// The kind of error that occurred.
///
/// Callers match on `ErrorKind` to tell a missing provider apart from a
/// broken connection or corrupt upstream data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, Display)]
#[non_exhaustive]
pub enum ErrorKind {
    // =========================================================================
    // General errors
    // =========================================================================
    /// Invalid configuration or parameters
    ConfigInvalid,

    // =========================================================================
    // Lookup errors
    // =========================================================================
    /// A requested provider, consumer or graph node does not exist
    NotFound,

    // =========================================================================
    // Graph errors
    // =========================================================================
    /// Graph data contradicts itself (dangling parent, duplicate node id)
    InvariantViolation,

    // =========================================================================
    // Transport errors
    // =========================================================================
    /// The placement service answered with a non-success status
    TransportFailed,

    /// Could not reach the placement service at all
    ConnectionFailed,

    /// Timeout occurred
    Timeout,

    // =========================================================================
    // Serialization errors
    // =========================================================================
    /// A response body could not be decoded into the expected shape
    DeserializationFailed,

    /// A record is missing a required member
    InvalidFormat,

    // =========================================================================
    // File/IO errors
    // =========================================================================
    /// Permission denied
    PermissionDenied,

    /// IO operation failed
    IoFailed,
}

impl ErrorKind {
    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }

    /// Check if this error kind is retryable by default
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::Timeout | ErrorKind::ConnectionFailed | ErrorKind::IoFailed
        )
    }
}
