//! Error types for the `anemone` binary.

use anemone_core::ConfigIssue;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading presets and rendering audio.
#[derive(Debug, Error)]
pub enum CliError {
    /// WAV decode or encode failure.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Failed to read a preset file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Preset name matched neither a factory preset nor a file.
    #[error("preset not found: {0}")]
    PresetNotFound(String),

    /// A `--param` override that could not be applied.
    #[error("invalid parameter '{param}': {reason}")]
    InvalidParameter {
        /// Parameter key as given on the command line.
        param: String,
        /// Description of why the parameter is invalid.
        reason: String,
    },

    /// The engine cannot run with this configuration.
    #[error("engine configuration rejected: {0}")]
    Config(#[from] ConfigIssue),

    /// Unsupported output bit depth.
    #[error("unsupported bit depth {0} (expected 16, 24 or 32)")]
    BitDepth(u16),
}

impl CliError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CliError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid parameter error.
    pub fn invalid_parameter(param: impl Into<String>, reason: impl Into<String>) -> Self {
        CliError::InvalidParameter {
            param: param.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience result type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
