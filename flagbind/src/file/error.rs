//! Errors raised while reading a config file.

use std::io;
use std::path::Path;
use std::sync::Arc;

use crate::BindError;

/// Wrap `err` as a [`BindError::File`] for `path`.
pub(super) fn file_error(
    path: &Path,
    err: impl Into<Box<dyn std::error::Error + Send + Sync>>,
) -> Arc<BindError> {
    Arc::new(BindError::File {
        path: path.to_path_buf(),
        source: err.into(),
    })
}

/// A file turned away before parsing: absent, or in a format this build
/// cannot read.
pub(super) fn refused(path: &Path, kind: io::ErrorKind, reason: impl Into<String>) -> Arc<BindError> {
    file_error(path, io::Error::new(kind, reason.into()))
}

/// The format is known but its cargo feature is off.
#[cfg(not(all(feature = "yaml", feature = "toml", feature = "json")))]
pub(super) fn disabled(path: &Path, feature: &str) -> Arc<BindError> {
    refused(
        path,
        io::ErrorKind::Unsupported,
        format!("{feature} support is disabled; enable the '{feature}' feature"),
    )
}
