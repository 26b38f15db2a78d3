//! Bind a declarative configuration schema to command-line flags,
//! environment variables and a config file.
//!
//! A configuration type describes its fields once through [`ConfigSchema`].
//! A [`Manager`] registers one clap flag per leaf option, binds each option
//! to `<PREFIX>_<NAME>` in the environment, merges an optional config file,
//! and decodes the result into the typed struct with precedence
//! flag > environment > file > default.
//!
//! ```rust,no_run
//! use flagbind::{ConfigSchema, Field, Kind, Manager};
//! use serde::Deserialize;
//! use std::collections::BTreeMap;
//!
//! #[derive(Deserialize)]
//! struct Server {
//!     port: i64,
//!     labels: BTreeMap<String, String>,
//! }
//!
//! #[derive(Deserialize)]
//! struct AppConfig {
//!     server: Server,
//! }
//!
//! impl ConfigSchema for AppConfig {
//!     const SCHEMA: Kind = Kind::Struct(&[Field::new(
//!         "server",
//!         Kind::Struct(&[
//!             Field::new("port", Kind::Int64).short('p').description("listen port"),
//!             Field::new("labels", Kind::StringMap).description("key=value labels"),
//!         ]),
//!     )]);
//! }
//!
//! # fn main() -> flagbind::BindResult<()> {
//! let mut manager = Manager::new("app");
//! manager.add_config_flag();
//! manager.init_flags::<AppConfig>();
//! let matches = manager.parse_from(std::env::args_os())?;
//! manager.read_from_file(&matches)?;
//! let config: AppConfig = manager.unmarshal()?;
//! # let _ = config;
//! # Ok(())
//! # }
//! ```

mod env;
mod error;
mod file;
mod flags;
mod hook;
pub mod logging;
mod manager;
mod register;
mod result_ext;
mod schema;

use std::sync::Arc;

pub use env::env_var_name;
pub use error::{BindError, is_display_request};
pub use file::load_config_file;
pub use hook::split_key_value_pairs;
pub use manager::{CONFIG_FLAG, DEFAULT_CONFIG_PATH, Manager, config_arg};
pub use result_ext::BindResultExt;
pub use schema::{ConfigSchema, Field, Kind, OptionDescriptor};

pub use clap;
pub use figment;

/// Result type used throughout the crate.
///
/// Errors are shared behind an [`Arc`] so they can be cloned into
/// diagnostics without losing their source chain.
pub type BindResult<T> = Result<T, Arc<BindError>>;
