//! YAML source for figment, parsed with `serde-saphyr`.

use std::path::{Path, PathBuf};

use figment::value::{Dict, Map};
use figment::{Metadata, Profile, Provider};
use serde_saphyr::Options;

/// In-memory YAML read from a config file.
///
/// Only `true` and `false` are booleans; `yes`, `on` and friends stay
/// strings. Blank contents yield an empty table.
#[derive(Debug, Clone)]
pub(crate) struct YamlSource {
    path: PathBuf,
    contents: String,
}

impl YamlSource {
    pub(crate) fn new(path: &Path, contents: &str) -> Self {
        Self {
            path: path.to_path_buf(),
            contents: contents.to_owned(),
        }
    }

    fn table(&self) -> Result<Dict, figment::Error> {
        if self.contents.trim().is_empty() {
            return Ok(Dict::new());
        }
        let options = Options {
            strict_booleans: true,
            ..Options::default()
        };
        serde_saphyr::from_str_with_options::<Dict>(&self.contents, options).map_err(|err| {
            figment::Error::from(format!("failed to parse {}: {err}", self.path.display()))
        })
    }
}

impl Provider for YamlSource {
    fn metadata(&self) -> Metadata {
        Metadata::from("YAML file", self.path.as_path())
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        self.table().map(|dict| Profile::Default.collect(dict))
    }
}
