//! Shared configuration schema and loading helpers for integration tests.

use std::collections::BTreeMap;

use anyhow::{Result, anyhow};
use flagbind::{BindResult, ConfigSchema, Field, Kind, Manager};
use serde::Deserialize;

pub const SERVER: &[Field] = &[
    Field::new("address", Kind::String).description("listen address"),
    Field::new("port", Kind::Int64).short('p').description("listen port"),
    Field::new("max-conns", Kind::Uint64).description("connection limit"),
    Field::new("labels", Kind::StringMap).description("key=value labels"),
];

pub const LOG: &[Field] = &[Field::new("debug", Kind::Bool).short('d')];

#[derive(Debug, Deserialize, PartialEq)]
pub struct ServerConfig {
    pub address: String,
    pub port: i64,
    #[serde(rename = "max-conns")]
    pub max_conns: u64,
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct LogConfig {
    pub debug: bool,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(flatten)]
    pub log: LogConfig,
    pub tags: Vec<String>,
    pub ratio: f64,
}

impl ConfigSchema for AppConfig {
    const SCHEMA: Kind = Kind::Struct(&[
        Field::new("server", Kind::Struct(SERVER)),
        Field::flatten(LOG),
        Field::new("tags", Kind::StringSeq).short('t'),
        Field::new("ratio", Kind::Float64),
        Field::new("-", Kind::String),
    ]);
}

/// A manager named `app` with the config flag and [`AppConfig`] registered.
pub fn manager() -> Manager {
    let mut manager = Manager::new("app");
    manager.add_config_flag();
    manager.init_flags::<AppConfig>();
    manager
}

/// Run the full start-up sequence: parse, read the file, decode.
pub fn bind(manager: &mut Manager, args: &[&str]) -> BindResult<AppConfig> {
    let matches = manager.parse_from(args.iter().copied())?;
    manager.read_from_file(&matches)?;
    manager.unmarshal()
}

/// [`bind`] on a fresh [`manager`], flattening errors into `anyhow`.
pub fn load(args: &[&str]) -> Result<AppConfig> {
    bind(&mut manager(), args).map_err(|err| anyhow!(err.to_string()))
}
