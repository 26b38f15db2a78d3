//! Minimal server start-up showing flags, environment and file binding.
//!
//! ```text
//! cargo run --example server -- --config= --server.port 9000 --label env=dev
//! SERVER_SERVER_PORT=8000 cargo run --example server -- --config=
//! ```

use std::collections::BTreeMap;
use std::process::ExitCode;

use flagbind::logging::{LogOptions, init_logging};
use flagbind::{BindResult, ConfigSchema, Field, Kind, Manager, is_display_request};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Listen {
    address: String,
    port: i64,
}

#[derive(Debug, Deserialize)]
struct ServerConfig {
    server: Listen,
    debug: bool,
    #[serde(rename = "label")]
    labels: BTreeMap<String, String>,
}

impl ConfigSchema for ServerConfig {
    const SCHEMA: Kind = Kind::Struct(&[
        Field::new(
            "server",
            Kind::Struct(&[
                Field::new("address", Kind::String).description("address to bind"),
                Field::new("port", Kind::Int64).short('p').description("port to bind"),
            ]),
        ),
        Field::new("debug", Kind::Bool).short('d').description("verbose logging"),
        Field::new("label", Kind::StringMap).description("key=value metadata, repeatable"),
    ]);
}

fn run() -> BindResult<ServerConfig> {
    let mut manager = Manager::new("server");
    manager.add_config_flag();
    manager.init_flags::<ServerConfig>();
    let matches = manager.parse_from(std::env::args_os())?;
    manager.read_from_file(&matches)?;
    manager.unmarshal()
}

fn main() -> ExitCode {
    let config = match run() {
        Ok(config) => config,
        Err(err) => {
            if let Some(clap_err) = err.as_clap().filter(|e| is_display_request(e)) {
                clap_err.exit();
            }
            let _unused = init_logging(&LogOptions::default());
            tracing::error!(error = %err, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    let options = LogOptions {
        debug: config.debug,
        filter: None,
    };
    if let Err(err) = init_logging(&options) {
        tracing::error!(error = %err, "logging unavailable");
        return ExitCode::FAILURE;
    }
    tracing::info!(
        address = %config.server.address,
        port = config.server.port,
        labels = ?config.labels,
        "configuration loaded"
    );
    ExitCode::SUCCESS
}
