/*!
 * Error types for the subburn application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while transcoding captions into a styled script
#[derive(Error, Debug)]
pub enum TranscodeError {
    /// A time field could not be parsed
    #[error("Malformed timestamp: '{0}'")]
    MalformedTimestamp(String),

    /// A color does not have 6 hex digits after shorthand expansion
    #[error("Invalid color: '{0}' (expected 3 or 6 hex digits)")]
    InvalidColor(String),

    /// A numeric style field is out of range
    #[error("Invalid value for style field '{field}': {reason}")]
    InvalidStyleField {
        /// Configuration field name
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// An encoder error raised while processing a named configuration field
    #[error("Invalid value for style field '{field}': {source}")]
    StyleField {
        /// Configuration field name
        field: &'static str,
        /// Underlying encoder error
        #[source]
        source: Box<TranscodeError>,
    },
}

impl TranscodeError {
    /// Attach the name of the configuration field that produced this error
    pub fn for_field(self, field: &'static str) -> Self {
        Self::StyleField {
            field,
            source: Box::new(self),
        }
    }
}

/// Errors raised by the external rendering and font tooling
#[derive(Error, Debug)]
pub enum RenderError {
    /// The external tool could not be started
    #[error("Failed to start '{tool}': {message}")]
    ToolNotFound {
        /// Tool name or path
        tool: String,
        /// OS error message
        message: String,
    },

    /// The external tool exited unsuccessfully
    #[error("'{tool}' failed: {message}")]
    Failed {
        /// Tool name or path
        tool: String,
        /// Filtered stderr output
        message: String,
    },

    /// The external tool did not finish in time
    #[error("'{tool}' timed out after {secs} seconds")]
    TimedOut {
        /// Tool name or path
        tool: String,
        /// Timeout that elapsed
        secs: u64,
    },

    /// No usable background image exists for previews
    #[error("No background images found in {0:?}")]
    NoBackgrounds(PathBuf),

    /// IO failure around temporary script files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from transcoding
    #[error("Transcode error: {0}")]
    Transcode(#[from] TranscodeError),

    /// Error from rendering
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
