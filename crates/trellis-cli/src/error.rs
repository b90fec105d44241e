//! Error types for the CLI.

use std::{io, path::PathBuf};

use thiserror::Error;

use trellis::TrellisError;

/// The main error type for the CLI.
///
/// TOML syntax errors keep the text they were found in so the report can
/// point at the offending span.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid graph document `{path}`")]
    Document {
        path: PathBuf,
        src: String,
        #[source]
        err: toml::de::Error,
    },

    #[error("Invalid configuration file `{path}`")]
    Config {
        path: PathBuf,
        src: String,
        #[source]
        err: toml::de::Error,
    },

    #[error("Missing configuration file: {0}")]
    MissingConfig(PathBuf),

    #[error("Layout error: {0}")]
    Layout(#[from] TrellisError),

    #[error("Failed to write report: {0}")]
    Report(#[from] toml::ser::Error),
}

impl CliError {
    /// The TOML error and the text it refers to, for variants that carry one.
    pub fn toml_source(&self) -> Option<(&toml::de::Error, &String)> {
        match self {
            CliError::Document { src, err, .. } | CliError::Config { src, err, .. } => {
                Some((err, src))
            }
            _ => None,
        }
    }
}
