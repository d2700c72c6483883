//! Application-level errors (wraps domain errors)

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::domain::DomainError;

/// What a file was being opened for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Reading,
    Writing,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Access::Reading => f.write_str("reading"),
            Access::Writing => f.write_str("writing"),
        }
    }
}

/// Application errors wrap domain errors and add source/codec context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    /// Strict-mode merge failure, surfaced verbatim.
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("couldn't decode source (input file #{index}): {message}")]
    Decode { index: usize, message: String },

    #[error("couldn't read source (input file #{index}): {source}")]
    Read {
        index: usize,
        #[source]
        source: io::Error,
    },

    #[error("couldn't re-serialize merged documents: {message}")]
    Serialize { message: String },

    #[error("cannot open {} for {}: {}", .path.display(), .access, .source)]
    Open {
        path: PathBuf,
        access: Access,
        #[source]
        source: io::Error,
    },

    #[error("config error: {message}")]
    Config { message: String },
}

impl ApplicationError {
    /// Whether the failure happened while decoding, merging or re-encoding documents,
    /// as opposed to while locating inputs or loading settings.
    pub fn is_merge_failure(&self) -> bool {
        matches!(
            self,
            ApplicationError::Domain(_)
                | ApplicationError::Decode { .. }
                | ApplicationError::Read { .. }
                | ApplicationError::Serialize { .. }
        )
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_open_error_when_displayed_then_names_path_and_access() {
        let err = ApplicationError::Open {
            path: PathBuf::from("out.yaml"),
            access: Access::Writing,
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        assert_eq!(err.to_string(), "cannot open out.yaml for writing: permission denied");
        assert!(!err.is_merge_failure());
    }
}
