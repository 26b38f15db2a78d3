//! Registration walk turning an option table into clap arguments.

use std::collections::{HashMap, HashSet};

use clap::{Arg, ArgAction, builder::BoolishValueParser, value_parser};

use crate::schema::{Field, Kind, OptionDescriptor};

/// Long and short names clap claims for itself.
const RESERVED_LONG: [&str; 1] = ["help"];
const RESERVED_SHORT: [char; 1] = ['h'];

/// Tracks claimed names so that schema collisions fail loudly.
#[derive(Debug)]
pub(crate) struct Registry {
    longs: HashSet<String>,
    shorts: HashMap<char, String>,
    options: Vec<OptionDescriptor>,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            longs: RESERVED_LONG.iter().map(|s| (*s).to_owned()).collect(),
            shorts: RESERVED_SHORT
                .iter()
                .map(|c| (*c, String::from("help")))
                .collect(),
            options: Vec::new(),
        }
    }
}

impl Registry {
    /// Registered leaf options in declaration order.
    pub(crate) fn options(&self) -> &[OptionDescriptor] {
        &self.options
    }

    /// Whether `key` is a registered leaf option or sits beneath one.
    pub(crate) fn covers(&self, key: &str) -> bool {
        self.options.iter().any(|opt| {
            key.strip_prefix(opt.name.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
        })
    }

    /// Claim a long name and optional short alias.
    ///
    /// # Panics
    ///
    /// Panics when either name is already taken.
    pub(crate) fn claim(&mut self, long: &str, short: Option<char>) {
        assert!(
            self.longs.insert(long.to_owned()),
            "duplicate option name in config: {long}"
        );
        if let Some(c) = short {
            if let Some(owner) = self.shorts.insert(c, long.to_owned()) {
                panic!("short alias -{c} for {long} is already used by {owner}");
            }
        }
    }

    /// Walk `fields` beneath `prefix`, returning the arguments to register.
    ///
    /// # Panics
    ///
    /// Panics on unsupported kinds and on name collisions.
    pub(crate) fn walk(&mut self, prefix: &str, fields: &[Field]) -> Vec<Arg> {
        let mut args = Vec::new();
        for field in fields {
            let kind = field.kind();
            if field.is_unnamed() && !matches!(kind, Kind::Struct(_)) {
                continue;
            }
            let name = field.qualified_name(prefix);
            match kind {
                Kind::Struct(children) => args.extend(self.walk(&name, children)),
                Kind::Unsupported(ty) => panic!("unknown type in config: {ty} (option {name})"),
                _ => {
                    self.claim(&name, field.short_alias());
                    tracing::debug!(option = %name, ?kind, "registered flag");
                    args.push(leaf_arg(&name, field));
                    self.options.push(OptionDescriptor {
                        name,
                        kind,
                        description: field.help(),
                        short: field.short_alias(),
                    });
                }
            }
        }
        args
    }
}

/// Build the clap argument for a leaf option.
fn leaf_arg(name: &str, field: &Field) -> Arg {
    let mut arg = Arg::new(name.to_owned()).long(name.to_owned());
    if let Some(c) = field.short_alias() {
        arg = arg.short(c);
    }
    if !field.help().is_empty() {
        arg = arg.help(field.help());
    }
    match field.kind() {
        Kind::String => arg
            .action(ArgAction::Set)
            .default_value("")
            .value_parser(value_parser!(String)),
        Kind::Bool => arg
            .action(ArgAction::Set)
            .num_args(0..=1)
            .require_equals(true)
            .default_value("false")
            .default_missing_value("true")
            .value_parser(BoolishValueParser::new()),
        Kind::Int => arg
            .action(ArgAction::Set)
            .default_value("0")
            .allow_negative_numbers(true)
            .value_parser(value_parser!(isize)),
        Kind::Int64 => arg
            .action(ArgAction::Set)
            .default_value("0")
            .allow_negative_numbers(true)
            .value_parser(value_parser!(i64)),
        Kind::Uint => arg
            .action(ArgAction::Set)
            .default_value("0")
            .value_parser(value_parser!(usize)),
        Kind::Uint64 => arg
            .action(ArgAction::Set)
            .default_value("0")
            .value_parser(value_parser!(u64)),
        Kind::Float64 => arg
            .action(ArgAction::Set)
            .default_value("0")
            .allow_negative_numbers(true)
            .value_parser(value_parser!(f64)),
        Kind::StringSeq | Kind::StringMap => arg
            .action(ArgAction::Append)
            .value_delimiter(',')
            .value_parser(value_parser!(String)),
        Kind::Struct(_) | Kind::Unsupported(_) => arg,
    }
}
