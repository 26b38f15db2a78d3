//! Per-format parsing of config file contents.

use std::io;
use std::path::Path;

use figment::Figment;
#[cfg(any(feature = "toml", feature = "json"))]
use figment::providers::Format;

#[cfg(not(all(feature = "yaml", feature = "toml", feature = "json")))]
use super::error::disabled;
#[cfg(any(feature = "toml", feature = "json"))]
use super::error::file_error;
use super::error::refused;
use crate::BindResult;

/// Parse `data` according to the extension of `path`.
///
/// `.yml`/`.yaml`, `.toml` and `.json` are recognised; each requires the
/// matching crate feature.
///
/// # Errors
///
/// Returns a [`crate::BindError::File`] if the contents fail to parse, the
/// extension is unknown, or the required feature is disabled.
pub(super) fn parse_config_by_format(path: &Path, data: &str) -> BindResult<Figment> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("yaml" | "yml") => yaml(path, data),
        Some("toml") => toml(path, data),
        Some("json") => json(path, data),
        other => Err(refused(
            path,
            io::ErrorKind::Unsupported,
            format!("unsupported config type {:?}", other.unwrap_or_default()),
        )),
    }
}

#[cfg(feature = "yaml")]
fn yaml(path: &Path, data: &str) -> BindResult<Figment> {
    Ok(Figment::from(super::yaml::YamlSource::new(path, data)))
}

#[cfg(not(feature = "yaml"))]
fn yaml(path: &Path, _data: &str) -> BindResult<Figment> {
    Err(disabled(path, "yaml"))
}

#[cfg(feature = "toml")]
fn toml(path: &Path, data: &str) -> BindResult<Figment> {
    // Parse up front so syntax errors name this file.
    ::toml::from_str::<::toml::Table>(data).map_err(|e| file_error(path, e))?;
    Ok(Figment::from(figment::providers::Toml::string(data)))
}

#[cfg(not(feature = "toml"))]
fn toml(path: &Path, _data: &str) -> BindResult<Figment> {
    Err(disabled(path, "toml"))
}

#[cfg(feature = "json")]
fn json(path: &Path, data: &str) -> BindResult<Figment> {
    serde_json::from_str::<serde_json::Value>(data).map_err(|e| file_error(path, e))?;
    Ok(Figment::from(figment::providers::Json::string(data)))
}

#[cfg(not(feature = "json"))]
fn json(path: &Path, _data: &str) -> BindResult<Figment> {
    Err(disabled(path, "json"))
}
