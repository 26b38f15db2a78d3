//! Helpers for classifying and routing external errors.

use clap::{Error as ClapError, error::ErrorKind};

use super::BindError;

/// Returns `true` when a [`clap::Error`] corresponds to `--help` or
/// `--version`.
///
/// Entry points that call [`crate::Manager::parse_from`] receive these
/// requests as [`BindError::CliParsing`]; checking this lets them delegate to
/// [`clap::Error::exit`] and keep the expected zero exit status.
#[must_use]
pub fn is_display_request(err: &ClapError) -> bool {
    matches!(
        err.kind(),
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
    )
}

impl BindError {
    /// Returns the wrapped [`clap::Error`] when this is a CLI parsing failure.
    #[must_use]
    pub fn as_clap(&self) -> Option<&ClapError> {
        match self {
            Self::CliParsing(err) => Some(err),
            _ => None,
        }
    }
}
