//! Configuration errors surfaced to the user before a run starts

use std::path::PathBuf;
use thiserror::Error;

/// A problem with what the user entered. The run never starts; the UI shows
/// the message as a blocking notice.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Executable path is invalid: {}", .0.display())]
    InvalidExecutable(PathBuf),

    #[error("Input path does not exist: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("Output folder is empty")]
    MissingOutput,

    #[error("Cannot create output folder {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{field} must be a whole number, got '{value}'")]
    NotANumber { field: &'static str, value: String },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },

    #[error("Region width and height must be greater than zero")]
    EmptyRegion,

    #[error("Pattern is empty")]
    EmptyPattern,

    #[error("Pattern is not a valid regular expression: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Allowed character set is empty")]
    EmptyWhitelist,
}
