//! Command-line layer built from parsed clap matches.

use std::any::Any;
use std::sync::Arc;

use clap::ArgMatches;
use clap::parser::{MatchesError, ValueSource};
use figment::value::{Dict, Tag, Value};

use crate::schema::{Kind, OptionDescriptor, insert_dotted};
use crate::{BindError, BindResult};

/// Collect the options that were explicitly given on the command line.
///
/// Values that only carry clap's registered default are left out so lower
/// precedence sources can still supply them.
///
/// # Errors
///
/// Returns [`BindError::Gathering`] when a stored value does not have the
/// type its option kind implies, which means the matches came from a
/// different command.
pub(crate) fn collect(matches: &ArgMatches, options: &[OptionDescriptor]) -> BindResult<Dict> {
    let mut dict = Dict::new();
    for option in options {
        if matches.value_source(&option.name) != Some(ValueSource::CommandLine) {
            continue;
        }
        let value = match option.kind {
            Kind::String => one::<String>(matches, &option.name)?.map(Value::from),
            Kind::Bool => one::<bool>(matches, &option.name)?.map(Value::from),
            Kind::Int => one::<isize>(matches, &option.name)?.map(Value::from),
            Kind::Int64 => one::<i64>(matches, &option.name)?.map(Value::from),
            Kind::Uint => one::<usize>(matches, &option.name)?.map(Value::from),
            Kind::Uint64 => one::<u64>(matches, &option.name)?.map(Value::from),
            Kind::Float64 => one::<f64>(matches, &option.name)?.map(Value::from),
            Kind::StringSeq | Kind::StringMap => many(matches, &option.name)?,
            Kind::Struct(_) | Kind::Unsupported(_) => None,
        };
        if let Some(value) = value {
            insert_dotted(&mut dict, &option.name, value);
        }
    }
    Ok(dict)
}

fn one<T>(matches: &ArgMatches, name: &str) -> BindResult<Option<T>>
where
    T: Any + Clone + Send + Sync + 'static,
{
    match matches.try_get_one::<T>(name) {
        Ok(value) => Ok(value.cloned()),
        Err(MatchesError::UnknownArgument { .. }) => Ok(None),
        Err(err) => Err(flag_error(name, &err)),
    }
}

fn many(matches: &ArgMatches, name: &str) -> BindResult<Option<Value>> {
    match matches.try_get_many::<String>(name) {
        Ok(values) => Ok(values.map(|items| {
            Value::Array(Tag::Default, items.cloned().map(Value::from).collect())
        })),
        Err(MatchesError::UnknownArgument { .. }) => Ok(None),
        Err(err) => Err(flag_error(name, &err)),
    }
}

fn flag_error(name: &str, err: &MatchesError) -> Arc<BindError> {
    Arc::new(BindError::Gathering(Box::new(figment::Error::from(
        format!("flag --{name}: {err}"),
    ))))
}
