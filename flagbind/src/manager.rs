//! The configuration manager tying flags, environment and files together.

use std::ffi::OsString;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Arg, ArgAction, ArgMatches, Command};
use figment::{
    Figment, Metadata, Profile, Provider,
    value::{Dict, Map},
};
use serde::de::DeserializeOwned;

use crate::env::{EnvBinding, ProcessEnv};
use crate::register::Registry;
use crate::schema::{
    ConfigSchema, Kind, OptionDescriptor, insert_dotted, leaf_keys, merge_dict,
};
use crate::{BindResult, BindResultExt, flags, hook, load_config_file};

/// Name of the reserved flag selecting the config file.
pub const CONFIG_FLAG: &str = "config";

/// Config file used when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "./config.yml";

/// Build the reserved `--config`/`-c` flag.
///
/// The flag is global so it can sit on a root command and still be read
/// from subcommand matches.
#[must_use]
pub fn config_arg() -> Arg {
    Arg::new(CONFIG_FLAG)
        .long(CONFIG_FLAG)
        .short('c')
        .global(true)
        .action(ArgAction::Set)
        .default_value(DEFAULT_CONFIG_PATH)
        .help("config file (default: config.yml in the current directory)")
}

/// A named figment layer holding already-collected values.
struct Layer {
    name: &'static str,
    dict: Dict,
}

impl Provider for Layer {
    fn metadata(&self) -> Metadata {
        Metadata::named(self.name)
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        Ok(Profile::Default.collect(self.dict.clone()))
    }
}

/// Binds a declarative configuration schema to flags, environment
/// variables and a config file.
///
/// Sources merge with precedence flag > environment > file > default.
///
/// ```
/// use flagbind::{ConfigSchema, Field, Kind, Manager};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Config {
///     port: i64,
/// }
///
/// impl ConfigSchema for Config {
///     const SCHEMA: Kind = Kind::Struct(&[Field::new("port", Kind::Int64)]);
/// }
///
/// # fn main() -> flagbind::BindResult<()> {
/// let mut manager = Manager::new("doc-example");
/// manager.init_flags::<Config>();
/// manager.parse_from(["doc-example", "--port", "8080"])?;
/// let config: Config = manager.unmarshal()?;
/// assert_eq!(config.port, 8080);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Manager {
    name: String,
    command: Command,
    registry: Registry,
    flags: Dict,
    file: Dict,
    config_file: Option<Utf8PathBuf>,
}

impl Manager {
    /// Create a manager whose command and environment prefix are `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            command: Command::new(name.clone()),
            name,
            registry: Registry::default(),
            flags: Dict::new(),
            file: Dict::new(),
            config_file: None,
        }
    }

    /// The manager's name, also the environment prefix.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add the reserved `--config`/`-c` flag to the manager's own command.
    ///
    /// # Panics
    ///
    /// Panics if an option already claimed `config` or `-c`.
    pub fn add_config_flag(&mut self) {
        self.registry.claim(CONFIG_FLAG, Some('c'));
        self.command = std::mem::take(&mut self.command).arg(config_arg());
    }

    /// Register one flag per leaf of `T`'s option table and bind each to its
    /// environment variable.
    ///
    /// Call once per manager.
    ///
    /// # Panics
    ///
    /// Panics when the schema is not a struct, contains an unsupported kind,
    /// or declares a name or short alias twice. These are programmer errors
    /// in the option table, not runtime conditions.
    pub fn init_flags<T: ConfigSchema>(&mut self) {
        let Kind::Struct(fields) = T::SCHEMA else {
            panic!("configuration is not a struct");
        };
        let args = self.registry.walk("", fields);
        self.command = std::mem::take(&mut self.command).args(args);
        tracing::debug!(
            prefix = %self.name,
            options = self.registry.options().len(),
            "bound flags to environment"
        );
    }

    /// The flag set: the clap command holding every registered option.
    ///
    /// Embed it in a larger CLI with [`Command::subcommand`] or augment it
    /// before parsing; pass the resulting matches to
    /// [`bind_matches`](Self::bind_matches).
    #[must_use]
    pub const fn command(&self) -> &Command {
        &self.command
    }

    /// Registered leaf options in declaration order.
    #[must_use]
    pub fn options(&self) -> &[OptionDescriptor] {
        self.registry.options()
    }

    /// Parse `args` (including the binary name) against the flag set and
    /// bind the result.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BindError::CliParsing`] for clap failures, including
    /// `--help` and `--version` requests (see
    /// [`is_display_request`](crate::is_display_request)).
    pub fn parse_from<I, T>(&mut self, args: I) -> BindResult<ArgMatches>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.command.clone().try_get_matches_from(args).into_bind()?;
        self.bind_matches(&matches)?;
        Ok(matches)
    }

    /// Record the command-line values from `matches` as the flag layer.
    ///
    /// Only values given on the command line are recorded; clap defaults
    /// stay below the environment and file.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BindError::Gathering`] when `matches` hold values of
    /// an unexpected type.
    pub fn bind_matches(&mut self, matches: &ArgMatches) -> BindResult<()> {
        self.flags = flags::collect(matches, self.registry.options())?;
        Ok(())
    }

    /// Merge the file named by the `config` flag below environment and flags.
    ///
    /// An absent flag or an empty path is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BindError::File`] when the file is missing,
    /// unreadable or unparseable.
    pub fn read_from_file(&mut self, matches: &ArgMatches) -> BindResult<()> {
        let path = matches
            .try_get_one::<String>(CONFIG_FLAG)
            .ok()
            .flatten()
            .filter(|p| !p.is_empty());
        let Some(path) = path else {
            return Ok(());
        };
        self.merge_file(Utf8Path::new(path))
    }

    /// Merge the config file at `path` below environment and flags.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BindError::File`] when the file is missing,
    /// unreadable or unparseable.
    pub fn merge_file(&mut self, path: &Utf8Path) -> BindResult<()> {
        let dict = load_config_file(path.as_std_path())?;
        merge_dict(&mut self.file, dict);
        self.config_file = Some(path.to_owned());
        Ok(())
    }

    /// Path of the last config file merged, if any.
    #[must_use]
    pub fn config_file(&self) -> Option<&Utf8Path> {
        self.config_file.as_deref()
    }

    /// Build the merged figment: defaults, file, environment, flags.
    ///
    /// The environment is read on each call.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BindError::Env`] when a bound variable holds a value
    /// its option cannot accept.
    pub fn figment(&self) -> BindResult<Figment> {
        let options = self.registry.options();
        let mut defaults = Dict::new();
        for option in options {
            if let Some(value) = option.kind.default_value() {
                insert_dotted(&mut defaults, &option.name, value);
            }
        }
        let extra: Vec<String> = leaf_keys(&self.file)
            .into_iter()
            .filter(|key| !self.registry.covers(key))
            .collect();
        let env = EnvBinding::new(&self.name).collect(&ProcessEnv, options, &extra)?;

        Ok(Figment::new()
            .merge(Layer {
                name: "defaults",
                dict: defaults,
            })
            .merge(Layer {
                name: "config file",
                dict: self.file.clone(),
            })
            .merge(Layer {
                name: "environment",
                dict: env,
            })
            .merge(Layer {
                name: "command line",
                dict: self.flags.clone(),
            }))
    }

    /// Snapshot of every merged setting, before the decode hook runs.
    ///
    /// # Errors
    ///
    /// Returns an error when a source cannot be read or merged.
    pub fn settings(&self) -> BindResult<serde_json::Value> {
        self.figment()?.extract::<serde_json::Value>().into_bind()
    }

    /// Decode the merged settings into `T`.
    ///
    /// String-map options given as `key=value` sequences are converted into
    /// maps before deserialisation.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BindError::InvalidMapEntry`] for a malformed
    /// `key=value` entry and [`crate::BindError::Decode`] when the settings
    /// do not fit `T`.
    pub fn unmarshal<T: DeserializeOwned>(&self) -> BindResult<T> {
        let mut settings = self.settings()?;
        hook::apply(&mut settings, self.registry.options())?;
        serde_json::from_value(settings).into_bind()
    }
}
