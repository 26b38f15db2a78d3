//! Declarative option tables describing a configuration struct.
//!
//! A configuration type lists its fields once, as `const` data, and the
//! [`Manager`](crate::Manager) walks that table to register flags and bind
//! sources. Nested tables become dotted namespaces.
//!
//! ```
//! use flagbind::{ConfigSchema, Field, Kind};
//!
//! struct Server;
//!
//! impl ConfigSchema for Server {
//!     const SCHEMA: Kind = Kind::Struct(&[
//!         Field::new("address", Kind::String).description("listen address"),
//!         Field::new("port", Kind::Int).short('p'),
//!     ]);
//! }
//! ```

use figment::value::{Dict, Tag, Value};

/// Names that mark a field as carrying no option of its own.
const SKIPPED_NAMES: [&str; 2] = ["", "-"];

/// The value type of a configuration field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Kind {
    /// A UTF-8 string. Defaults to `""`.
    String,
    /// A boolean switch. Defaults to `false`.
    Bool,
    /// A platform-width signed integer (`isize`).
    Int,
    /// A 64-bit signed integer.
    Int64,
    /// A platform-width unsigned integer (`usize`).
    Uint,
    /// A 64-bit unsigned integer.
    Uint64,
    /// A 64-bit float.
    Float64,
    /// A repeatable flag accumulating an ordered list of strings.
    StringSeq,
    /// A repeatable `key=value` flag decoded into a string map.
    StringMap,
    /// A nested table whose fields are namespaced under the parent name.
    Struct(&'static [Field]),
    /// A type that cannot be expressed as a flag, named for diagnostics.
    ///
    /// Registering a table containing this kind panics.
    Unsupported(&'static str),
}

impl Kind {
    /// The value an option of this kind takes when no source sets it.
    ///
    /// Returns `None` for nested tables and unsupported kinds.
    #[must_use]
    pub fn default_value(self) -> Option<Value> {
        let value = match self {
            Self::String => Value::from(String::new()),
            Self::Bool => Value::from(false),
            Self::Int => Value::from(0_isize),
            Self::Int64 => Value::from(0_i64),
            Self::Uint => Value::from(0_usize),
            Self::Uint64 => Value::from(0_u64),
            Self::Float64 => Value::from(0.0_f64),
            Self::StringSeq | Self::StringMap => Value::Array(Tag::Default, Vec::new()),
            Self::Struct(_) | Self::Unsupported(_) => return None,
        };
        Some(value)
    }

    /// Whether the flag for this kind may be supplied more than once.
    #[must_use]
    pub const fn is_repeatable(self) -> bool {
        matches!(self, Self::StringSeq | Self::StringMap)
    }
}

/// One entry in an option table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Field {
    name: &'static str,
    description: &'static str,
    short: Option<char>,
    kind: Kind,
}

impl Field {
    /// Declare a field bound to option `name`.
    ///
    /// An empty or `-` name skips leaf fields entirely and turns nested
    /// tables into namespace-only tables whose children join the parent
    /// namespace.
    #[must_use]
    pub const fn new(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            description: "",
            short: None,
            kind,
        }
    }

    /// Declare a nested table that only contributes its children.
    #[must_use]
    pub const fn flatten(fields: &'static [Self]) -> Self {
        Self::new("", Kind::Struct(fields))
    }

    /// Attach help text.
    #[must_use]
    pub const fn description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Attach a single-character short alias.
    #[must_use]
    pub const fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// The option name as declared, without any namespace prefix.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The help text.
    #[must_use]
    pub const fn help(&self) -> &'static str {
        self.description
    }

    /// The short alias, if any.
    #[must_use]
    pub const fn short_alias(&self) -> Option<char> {
        self.short
    }

    /// The value kind.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.kind
    }

    /// Whether the declared name opts this field out of naming.
    #[must_use]
    pub fn is_unnamed(&self) -> bool {
        SKIPPED_NAMES.contains(&self.name)
    }

    /// The dotted name for this field beneath `prefix`.
    ///
    /// Unnamed fields keep the prefix unchanged.
    #[must_use]
    pub fn qualified_name(&self, prefix: &str) -> String {
        match (prefix.is_empty(), self.is_unnamed()) {
            (_, true) => prefix.to_owned(),
            (true, false) => self.name.to_owned(),
            (false, false) => format!("{prefix}.{}", self.name),
        }
    }
}

/// Implemented by configuration structs to expose their option table.
///
/// The schema must be a [`Kind::Struct`]; anything else is rejected when the
/// table is registered.
pub trait ConfigSchema {
    /// The option table for this configuration.
    const SCHEMA: Kind;
}

/// A registered leaf option, derived from a [`Field`] during registration.
#[derive(Clone, Debug, PartialEq)]
pub struct OptionDescriptor {
    /// Fully-qualified dotted name.
    pub name: String,
    /// Value kind.
    pub kind: Kind,
    /// Help text.
    pub description: &'static str,
    /// Optional single-character alias.
    pub short: Option<char>,
}

/// Insert `value` into `dict` at the nested location named by a dotted key.
///
/// Intermediate tables are created as needed; a non-table value standing in
/// the way is replaced.
pub(crate) fn insert_dotted(dict: &mut Dict, key: &str, value: Value) {
    match key.split_once('.') {
        None => {
            dict.insert(key.to_owned(), value);
        }
        Some((head, rest)) => {
            let entry = dict
                .entry(head.to_owned())
                .or_insert_with(|| Value::Dict(Tag::Default, Dict::new()));
            if !matches!(entry, Value::Dict(..)) {
                *entry = Value::Dict(Tag::Default, Dict::new());
            }
            if let Value::Dict(_, inner) = entry {
                insert_dotted(inner, rest, value);
            }
        }
    }
}

/// Deep-merge `source` into `target`.
///
/// Tables present on both sides merge key by key; any other value in
/// `source` replaces the one in `target`. Keys are never split, so a key
/// holding a `.` survives intact.
pub(crate) fn merge_dict(target: &mut Dict, source: Dict) {
    for (key, value) in source {
        let merged = match (target.remove(&key), value) {
            (Some(Value::Dict(tag, mut existing)), Value::Dict(_, incoming)) => {
                merge_dict(&mut existing, incoming);
                Value::Dict(tag, existing)
            }
            (_, value) => value,
        };
        target.insert(key, merged);
    }
}

/// Collect the dotted names of every leaf in `dict`.
///
/// Keys that themselves contain a `.` cannot be named this way and are
/// left out, together with everything beneath them.
pub(crate) fn leaf_keys(dict: &Dict) -> Vec<String> {
    fn walk(prefix: &str, dict: &Dict, out: &mut Vec<String>) {
        for (key, value) in dict {
            if key.contains('.') {
                continue;
            }
            let name = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            match value {
                Value::Dict(_, inner) if !inner.is_empty() => walk(&name, inner, out),
                _ => out.push(name),
            }
        }
    }

    let mut out = Vec::new();
    walk("", dict, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, ensure};
    use rstest::rstest;

    #[rstest]
    #[case::top_level("", "port", "port")]
    #[case::nested("server", "port", "server.port")]
    #[case::unnamed_top("", "", "")]
    #[case::dash_keeps_prefix("server", "-", "server")]
    fn qualifies_names(
        #[case] prefix: &str,
        #[case] name: &'static str,
        #[case] expected: &str,
    ) -> Result<()> {
        let field = Field::new(name, Kind::String);
        ensure!(field.qualified_name(prefix) == expected);
        Ok(())
    }

    #[rstest]
    fn builder_sets_metadata() -> Result<()> {
        let field = Field::new("port", Kind::Int).short('p').description("listen port");
        ensure!(field.short_alias() == Some('p'));
        ensure!(field.help() == "listen port");
        ensure!(field.kind() == Kind::Int);
        Ok(())
    }

    #[rstest]
    fn nested_inserts_share_parents() -> Result<()> {
        let mut dict = Dict::new();
        insert_dotted(&mut dict, "server.port", Value::from(1_i64));
        insert_dotted(&mut dict, "server.host", Value::from("h"));
        insert_dotted(&mut dict, "debug", Value::from(true));
        let mut keys = leaf_keys(&dict);
        keys.sort();
        ensure!(keys == ["debug", "server.host", "server.port"], "got {keys:?}");
        Ok(())
    }

    #[rstest]
    fn merge_keeps_dotted_keys_and_sibling_tables() -> Result<()> {
        let mut target = Dict::new();
        insert_dotted(&mut target, "server.port", Value::from(1_i64));
        insert_dotted(&mut target, "server.host", Value::from("old"));

        let mut labels = Dict::new();
        labels.insert(String::from("app.kubernetes.io/name"), Value::from("web"));
        let mut server = Dict::new();
        server.insert(String::from("host"), Value::from("new"));
        server.insert(String::from("labels"), Value::Dict(Tag::Default, labels));
        let mut source = Dict::new();
        source.insert(String::from("server"), Value::Dict(Tag::Default, server));

        merge_dict(&mut target, source);
        let json = serde_json::to_value(&target)?;
        ensure!(
            json == serde_json::json!({
                "server": {
                    "port": 1,
                    "host": "new",
                    "labels": {"app.kubernetes.io/name": "web"}
                }
            }),
            "got {json}"
        );
        ensure!(
            leaf_keys(&target) == ["server.host", "server.port"],
            "dotted keys must not be named: {:?}",
            leaf_keys(&target)
        );
        Ok(())
    }

    #[rstest]
    fn repeatable_kinds_default_to_empty_arrays() -> Result<()> {
        for kind in [Kind::StringSeq, Kind::StringMap] {
            ensure!(kind.is_repeatable());
            ensure!(matches!(kind.default_value(), Some(Value::Array(_, v)) if v.is_empty()));
        }
        ensure!(Kind::Struct(&[]).default_value().is_none());
        Ok(())
    }
}
