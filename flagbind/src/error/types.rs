//! Primary error enum for configuration binding flows.

use figment::Error as FigmentError;
use thiserror::Error;

/// Errors that can occur while binding configuration sources.
///
/// Schema mistakes (a non-struct root, an unsupported field kind, duplicate
/// option names) are programmer errors and panic during registration instead
/// of surfacing here. Every variant below stems from runtime input.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BindError {
    /// Error parsing command-line arguments.
    #[error("Failed to parse command-line arguments: {0}")]
    CliParsing(#[from] Box<clap::Error>),

    /// Error originating from a configuration file.
    #[error("Configuration file error in '{path}': {source}")]
    File {
        /// Path that triggered the configuration failure.
        path: std::path::PathBuf,
        /// Underlying error reported by the file loader.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An environment variable held a value the bound option cannot accept.
    #[error("Invalid value in environment variable '{var}': {message}")]
    Env {
        /// Name of the offending variable.
        var: String,
        /// Human-readable explanation of the failure.
        message: String,
    },

    /// Error while gathering configuration from providers.
    #[error("Failed to gather configuration: {0}")]
    Gathering(#[from] Box<FigmentError>),

    /// A repeated `key=value` occurrence had no `=`.
    #[error("invalid format for input {input}")]
    InvalidMapEntry {
        /// The occurrence exactly as supplied.
        input: String,
    },

    /// The merged settings could not be decoded into the target type.
    #[error("Failed to decode merged configuration: {source}")]
    Decode {
        /// Underlying deserialisation failure.
        #[source]
        source: serde_json::Error,
    },

    /// The logging subscriber could not be built or installed.
    #[error("Failed to initialise logging: {message}")]
    Logging {
        /// Human-readable explanation of the failure.
        message: String,
    },
}
