//! Environment variable binding for registered options.
//!
//! Every option resolves from `<PREFIX>_<NAME>`, upper-cased, with `.` and
//! `-` replaced by `_`. Variables set to an empty string count as set and
//! resolve to the option's empty value.

use std::ffi::OsString;
use std::str::FromStr;
use std::sync::Arc;

use figment::value::{Dict, Tag, Value};

use crate::schema::{Kind, OptionDescriptor, insert_dotted};
use crate::{BindError, BindResult};

/// Compute the environment variable bound to option `name` under `prefix`.
///
/// ```
/// assert_eq!(
///     flagbind::env_var_name("app", "server.max-conns"),
///     "APP_SERVER_MAX_CONNS"
/// );
/// assert_eq!(flagbind::env_var_name("", "debug"), "DEBUG");
/// ```
#[must_use]
pub fn env_var_name(prefix: &str, name: &str) -> String {
    let joined = if prefix.is_empty() {
        name.to_owned()
    } else {
        format!("{prefix}_{name}")
    };
    joined.replace(['.', '-'], "_").to_uppercase()
}

/// Source of environment values, swappable so tests need not touch the
/// process environment.
pub(crate) trait EnvSource {
    fn var(&self, key: &str) -> Option<OsString>;
}

/// Reads from the real process environment.
pub(crate) struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<OsString> {
        std::env::var_os(key)
    }
}

/// Resolves bound options (and any extra keys) from the environment.
pub(crate) struct EnvBinding<'a> {
    prefix: &'a str,
}

impl<'a> EnvBinding<'a> {
    pub(crate) const fn new(prefix: &'a str) -> Self {
        Self { prefix }
    }

    /// Collect values for registered `options` plus untyped `extra` keys.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::Env`] when a variable is not valid Unicode or
    /// cannot be converted to the option's kind.
    pub(crate) fn collect<S: EnvSource>(
        &self,
        source: &S,
        options: &[OptionDescriptor],
        extra: &[String],
    ) -> BindResult<Dict> {
        let mut dict = Dict::new();
        for option in options {
            let var = env_var_name(self.prefix, &option.name);
            if let Some(raw) = read_var(source, &var)? {
                tracing::trace!(option = %option.name, %var, "bound environment value");
                let value = parse_typed(option.kind, &raw).map_err(|message| {
                    Arc::new(BindError::Env {
                        var: var.clone(),
                        message,
                    })
                })?;
                insert_dotted(&mut dict, &option.name, value);
            }
        }
        for key in extra {
            let var = env_var_name(self.prefix, key);
            if let Some(raw) = read_var(source, &var)? {
                tracing::trace!(key = %key, %var, "bound automatic environment value");
                insert_dotted(&mut dict, key, parse_untyped(&raw));
            }
        }
        Ok(dict)
    }
}

fn read_var<S: EnvSource>(source: &S, var: &str) -> BindResult<Option<String>> {
    source
        .var(var)
        .map(|raw| {
            raw.into_string().map_err(|_| {
                Arc::new(BindError::Env {
                    var: var.to_owned(),
                    message: String::from("value is not valid Unicode"),
                })
            })
        })
        .transpose()
}

fn parse_number<T>(raw: &str, wrap: fn(T) -> Value) -> Result<Value, String>
where
    T: FromStr + Default,
    T::Err: std::fmt::Display,
{
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(wrap(T::default()));
    }
    trimmed
        .parse::<T>()
        .map(wrap)
        .map_err(|e| format!("cannot parse {trimmed:?}: {e}"))
}

fn parse_bool(raw: &str) -> Result<Value, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "f" | "false" => Ok(Value::from(false)),
        "1" | "t" | "true" => Ok(Value::from(true)),
        other => Err(format!("cannot parse {other:?} as a boolean")),
    }
}

fn split_list(raw: &str) -> Value {
    let items = if raw.trim().is_empty() {
        Vec::new()
    } else {
        raw.split(',')
            .map(|s| Value::from(s.trim().to_owned()))
            .collect()
    };
    Value::Array(Tag::Default, items)
}

/// Convert `raw` according to the option's kind.
fn parse_typed(kind: Kind, raw: &str) -> Result<Value, String> {
    match kind {
        Kind::String => Ok(Value::from(raw.to_owned())),
        Kind::Bool => parse_bool(raw),
        Kind::Int => parse_number::<isize>(raw, Value::from),
        Kind::Int64 => parse_number::<i64>(raw, Value::from),
        Kind::Uint => parse_number::<usize>(raw, Value::from),
        Kind::Uint64 => parse_number::<u64>(raw, Value::from),
        Kind::Float64 => parse_number::<f64>(raw, Value::from),
        Kind::StringSeq | Kind::StringMap => Ok(split_list(raw)),
        Kind::Struct(_) | Kind::Unsupported(_) => {
            Err(String::from("option kind cannot be bound to the environment"))
        }
    }
}

/// Parse a value for a key with no declared kind.
///
/// Comma-separated values become arrays unless they look like structured
/// data; everything else goes through figment's scalar parsing.
fn parse_untyped(raw: &str) -> Value {
    let trimmed = raw.trim();
    let structured = matches!(trimmed.chars().next(), Some('[' | '{' | '"' | '\''));
    if trimmed.contains(',') && !structured {
        return split_list(trimmed);
    }
    trimmed
        .parse()
        .unwrap_or_else(|_| Value::from(trimmed.to_owned()))
}
