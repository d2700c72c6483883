//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::exitcode;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Whether this error came out of decoding, merging or re-encoding documents.
    pub fn is_merge_failure(&self) -> bool {
        match self {
            CliError::Infra(InfraError::Application(e)) => e.is_merge_failure(),
            CliError::Infra(InfraError::Io { .. }) => false,
        }
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        exitcode::FAILURE
    }
}
