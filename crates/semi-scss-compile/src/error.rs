//! Error types for SCSS bundle compilation.
//!
//! Copyright (c) 2025 Posit, PBC

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a compilation run.
///
/// Compiler diagnostics are not represented here: they are reported per
/// pass (see [`crate::PassOutcome`]) and never abort the run.
#[derive(Debug, Error)]
pub enum ScssCompileError {
    /// A source tree (or a file inside it) could not be read during discovery
    #[error("Failed to read SCSS sources at {}: {source}", .path.display())]
    Discovery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration failed eager validation
    #[error("Invalid SCSS compile configuration: {message}")]
    InvalidConfig { message: String },

    /// Configuration file is not valid TOML for this configuration
    #[error("Failed to parse SCSS compile configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// File I/O error outside of discovery
    #[error("SCSS compile I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScssCompileError {
    pub(crate) fn discovery(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScssCompileError::Discovery {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        ScssCompileError::InvalidConfig {
            message: message.into(),
        }
    }
}
