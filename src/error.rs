//! Error types for record intake and data loading.

use thiserror::Error;

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A collaborator supplied a record that violates the input contract.
    InvalidInput,
    /// A record or document could not be decoded.
    Parse,
    /// The underlying store could not be read.
    Io,
}

/// Errors raised while taking records in from a data source.
///
/// A record-level error excludes that record only; the rest of the batch
/// is still evaluated.
#[derive(Debug, Error)]
pub enum Error {
    /// A flow violates the input contract.
    #[error("invalid flow '{id}': {reason}")]
    InvalidFlow { id: String, reason: String },

    /// A metric snapshot violates the input contract.
    #[error("invalid snapshot '{key}': {reason}")]
    InvalidSnapshot { key: String, reason: String },

    /// A record could not be decoded from the supplied document.
    #[error("failed to parse {what}: {message}")]
    Parse { what: String, message: String },

    /// Reading the source failed.
    #[error("read error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidFlow { .. } | Error::InvalidSnapshot { .. } => ErrorKind::InvalidInput,
            Error::Parse { .. } => ErrorKind::Parse,
            Error::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn invalid_flow(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidFlow {
            id: id.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_snapshot(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidSnapshot {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse {
            what: "document".to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(Error::invalid_flow("f", "x").kind(), ErrorKind::InvalidInput);
        assert_eq!(Error::invalid_snapshot("k", "x").kind(), ErrorKind::InvalidInput);

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(Error::from(io).kind(), ErrorKind::Io);
    }

    #[test]
    fn test_display() {
        let err = Error::invalid_flow("f-1", "channel set is empty");
        assert_eq!(err.to_string(), "invalid flow 'f-1': channel set is empty");
    }
}
