/// Error types for card validation and file scanning
///
/// Validation errors are carried as values inside a `ValidationResult`; file
/// errors are returned by `try_scan_file` and swallowed (with a log line) by
/// `scan_file`.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Reasons a single card number fails validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Normalized input does not hold exactly 16 digits
    #[error("card number must contain 16 digits, found {found}")]
    WrongLength { found: usize },

    /// Normalized input contains something other than ASCII digits
    #[error("card number must contain 16 digits and nothing else, found '{found}'")]
    NonDigitContent { found: char },

    /// Correct shape, but the Luhn checksum does not add up
    #[error("invalid card number (fails the Luhn check)")]
    FailedChecksum,
}

impl ValidationError {
    /// Stable machine-readable reason code
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::WrongLength { .. } => "wrong-length",
            ValidationError::NonDigitContent { .. } => "non-digit-content",
            ValidationError::FailedChecksum => "failed-checksum",
        }
    }
}

/// Failures while reading a file for scanning
#[derive(Debug, Error)]
pub enum FileError {
    #[error("file {} not found", path.display())]
    NotFound { path: PathBuf },

    /// Any other I/O failure, including content that is not valid UTF-8
    #[error("error reading file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FileError {
    /// Classify an I/O error raised while opening or reading `path`
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            FileError::NotFound { path: path.to_path_buf() }
        } else {
            FileError::Read { path: path.to_path_buf(), source }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FileError::NotFound { .. })
    }
}
