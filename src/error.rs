//! Error types for the pdfchain library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pdfchain operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while parsing or executing a command chain.
#[derive(Error, Debug)]
pub enum Error {
    /// A chain token is not a recognized command keyword.
    #[error("unknown command '{0}' (expected extract, merge, compress, or convert-to-docx)")]
    UnknownCommand(String),

    /// Wrong number of arguments for a command.
    #[error("wrong number of arguments for '{command}': expected {expected}, found {found}")]
    Arity {
        command: &'static str,
        expected: &'static str,
        found: usize,
    },

    /// A page range is malformed or outside the document.
    #[error("invalid page range: {0}")]
    InvalidPageRange(String),

    /// A referenced path does not exist.
    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A referenced document could not be decoded.
    #[error("unreadable document: {0}")]
    UnreadableDocument(String),

    /// The requested conversion is unavailable on this system.
    #[error("conversion unsupported: {0}")]
    ConversionUnsupported(String),

    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Process exit code for this error kind.
    ///
    /// Each taxonomy entry maps to a distinct code so scripts can tell
    /// failure modes apart without parsing stderr.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::UnknownCommand(_) => 2,
            Error::Arity { .. } => 3,
            Error::InvalidPageRange(_) => 4,
            Error::NotFound(_) => 5,
            Error::UnreadableDocument(_) => 6,
            Error::ConversionUnsupported(_) => 7,
            Error::Io(_) => 8,
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::UnreadableDocument(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownCommand("comress".into());
        assert!(err.to_string().contains("comress"));

        let err = Error::Arity {
            command: "extract",
            expected: "1 or 2",
            found: 3,
        };
        assert_eq!(
            err.to_string(),
            "wrong number of arguments for 'extract': expected 1 or 2, found 3"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_exit_codes_distinct() {
        let errors = [
            Error::UnknownCommand(String::new()),
            Error::Arity {
                command: "merge",
                expected: "1 or more",
                found: 0,
            },
            Error::InvalidPageRange(String::new()),
            Error::NotFound(PathBuf::new()),
            Error::UnreadableDocument(String::new()),
            Error::ConversionUnsupported(String::new()),
            Error::Io(io::Error::new(io::ErrorKind::Other, "x")),
        ];
        let mut codes: Vec<i32> = errors.iter().map(|e| e.exit_code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }
}
