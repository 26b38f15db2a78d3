//! Trait-based conversions between external error types and `BindError`.

use figment::Error as FigmentError;

use super::BindError;

impl From<clap::Error> for BindError {
    fn from(e: clap::Error) -> Self {
        Self::CliParsing(e.into())
    }
}

impl From<FigmentError> for BindError {
    fn from(e: FigmentError) -> Self {
        Self::Gathering(e.into())
    }
}

impl From<serde_json::Error> for BindError {
    fn from(source: serde_json::Error) -> Self {
        Self::Decode { source }
    }
}
