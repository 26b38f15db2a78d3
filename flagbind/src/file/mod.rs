//! Reading configuration files into a merge layer.

mod error;
mod parser;
#[cfg(feature = "yaml")]
mod yaml;

use std::io;
use std::path::Path;

use figment::value::Dict;

use crate::BindResult;

use error::{file_error, refused};
use parser::parse_config_by_format;

/// Load configuration from a file, selecting the parser based on extension.
///
/// Unlike discovery-style loaders, a missing file is an error: the caller
/// named this path explicitly.
///
/// # Errors
///
/// Returns [`crate::BindError::File`] if the file is missing, unreadable,
/// fails to parse, or has an unsupported extension.
pub fn load_config_file(path: &Path) -> BindResult<Dict> {
    if !path.is_file() {
        return Err(refused(path, io::ErrorKind::NotFound, "config file does not exist"));
    }
    let data = std::fs::read_to_string(path).map_err(|e| file_error(path, e))?;
    let figment = parse_config_by_format(path, &data)?;
    let dict = figment
        .extract::<Dict>()
        .map_err(|e| file_error(path, e))?;
    tracing::debug!(path = %path.display(), keys = dict.len(), "loaded config file");
    Ok(dict)
}
