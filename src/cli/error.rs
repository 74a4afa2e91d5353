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

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => exitcode::USAGE,
            CliError::Infra(InfraError::Io { .. }) => exitcode::IOERR,
            CliError::Infra(InfraError::Application(e)) => match e {
                ApplicationError::Domain(_)
                | ApplicationError::Parse { .. }
                | ApplicationError::UnsupportedFormat(_) => exitcode::DATAERR,
                ApplicationError::Config { .. } => exitcode::CONFIG,
                ApplicationError::OperationFailed { .. } => exitcode::IOERR,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use std::path::PathBuf;

    #[test]
    fn given_errors_when_mapping_exit_codes_then_sysexits() {
        let depth: CliError = ApplicationError::Domain(DomainError::DepthLimitExceeded {
            path: "a/b".into(),
            limit: 1,
        })
        .into();
        let config: CliError = ApplicationError::Config {
            message: "bad".into(),
        }
        .into();
        let format: CliError = ApplicationError::UnsupportedFormat(PathBuf::from("x.yaml")).into();

        assert_eq!(depth.exit_code(), exitcode::DATAERR);
        assert_eq!(config.exit_code(), exitcode::CONFIG);
        assert_eq!(format.exit_code(), exitcode::DATAERR);
        assert_eq!(CliError::Usage("x".into()).exit_code(), exitcode::USAGE);
    }
}
