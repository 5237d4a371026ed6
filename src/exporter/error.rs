//! Error types for the export pipeline.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while rebranding, rebuilding or signing an APK.
#[derive(Error, Debug)]
pub enum Error {
    /// A required input file is not where the run expects it.
    #[error("{what} not found: {}", .path.display())]
    MissingInput {
        /// Human-readable name of the input
        what: &'static str,
        /// Expected location
        path: PathBuf,
    },

    /// An external tool ran and exited unsuccessfully.
    #[error("{label}: `{command}` exited with {}", exit_label(.code))]
    CommandFailed {
        /// Label supplied by the caller (e.g. "Signing failed")
        label: String,
        /// Rendered command line, secrets redacted
        command: String,
        /// Exit code, `None` when killed by a signal
        code: Option<i32>,
        /// Captured standard error, printed by the runner
        stderr: String,
    },

    /// An external tool could not be started at all.
    #[error("failed to launch `{command}`: {error}")]
    CommandLaunch {
        /// Rendered command line, secrets redacted
        command: String,
        /// Underlying spawn error
        error: std::io::Error,
    },

    /// Filesystem error with the operation and path that caused it.
    #[error("{context} ({}): {error}", .path.display())]
    Fs {
        /// What was being attempted
        context: &'static str,
        /// Path involved
        path: PathBuf,
        /// Underlying error
        error: std::io::Error,
    },

    /// Plain IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// XML could not be read or written
    #[error("XML error in {}: {error}", .path.display())]
    Xml {
        /// Document being edited
        path: PathBuf,
        /// Parser/writer error
        error: quick_xml::Error,
    },

    /// Icon decoding, resizing or encoding failed
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Project archive could not be read or extracted
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Invalid glob pattern
    #[error("glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),

    /// Unreadable glob match
    #[error("glob error: {0}")]
    Glob(#[from] glob::GlobError),

    /// Invalid regular expression
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Anything else
    #[error("{0}")]
    GenericError(String),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// Attach the failing operation and path to IO errors.
pub trait ErrorExt<T> {
    /// Wraps an IO error into [`Error::Fs`].
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            error,
        })
    }
}

/// Turn a missing value into [`Error::GenericError`] with a message.
pub trait Context<T> {
    /// Adds a static message.
    fn context(self, msg: &str) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context(self, msg: &str) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(msg.to_string()))
    }
}

/// Return early with an [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::exporter::Error::GenericError(format!($($arg)*)))
    };
}
