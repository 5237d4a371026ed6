//! Top-level error types for the exporter binary.
//!
//! Everything that can abort a run funnels into [`AppError`] so the CLI can
//! print one failure banner and exit with status 1.

use thiserror::Error;

/// Result type alias for application-level operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Main error type for a GAE run
#[derive(Error, Debug)]
pub enum AppError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// properties.gae could not be loaded
    #[error(transparent)]
    Properties(#[from] crate::properties::PropertiesError),

    /// Pipeline errors (external tools, XML edits, icons, assets)
    #[error(transparent)]
    Export(#[from] crate::exporter::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

impl AppError {
    /// Whether the failure happened before any external tool could run.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            AppError::Cli(_)
                | AppError::Properties(_)
                | AppError::Export(crate::exporter::Error::MissingInput { .. })
        )
    }
}
