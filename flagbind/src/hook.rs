//! Decode hook turning repeated `key=value` strings into string maps.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::schema::{Kind, OptionDescriptor};
use crate::{BindError, BindResult};

/// Split each item on its first `=` into a key and a value.
///
/// Later duplicate keys overwrite earlier ones.
///
/// ```
/// let map = flagbind::split_key_value_pairs(["a=1", "b=x=y", "a=2"]).unwrap();
/// assert_eq!(map["a"], "2");
/// assert_eq!(map["b"], "x=y");
/// ```
///
/// # Errors
///
/// Returns [`BindError::InvalidMapEntry`] naming the first item without an
/// `=`.
pub fn split_key_value_pairs<I, S>(items: I) -> BindResult<BTreeMap<String, String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut map = BTreeMap::new();
    for item in items {
        let item = item.as_ref();
        let (key, value) = item.split_once('=').ok_or_else(|| {
            Arc::new(BindError::InvalidMapEntry {
                input: item.to_owned(),
            })
        })?;
        map.insert(key.to_owned(), value.to_owned());
    }
    Ok(map)
}

/// Rewrite every string-map option in `settings` whose value is a sequence
/// of strings into an object.
///
/// Values that are already objects, or sequences holding non-strings, are
/// left for deserialisation to judge.
///
/// # Errors
///
/// Returns [`BindError::InvalidMapEntry`] for a malformed element.
pub(crate) fn apply(settings: &mut Value, options: &[OptionDescriptor]) -> BindResult<()> {
    for option in options.iter().filter(|o| o.kind == Kind::StringMap) {
        let Some(slot) = lookup_mut(settings, &option.name) else {
            continue;
        };
        let Some(items) = string_items(slot) else {
            continue;
        };
        let pairs = split_key_value_pairs(items)?;
        *slot = Value::Object(
            pairs
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect::<Map<_, _>>(),
        );
    }
    Ok(())
}

fn lookup_mut<'a>(root: &'a mut Value, dotted: &str) -> Option<&'a mut Value> {
    dotted
        .split('.')
        .try_fold(root, |node, segment| node.as_object_mut()?.get_mut(segment))
}

fn string_items(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|item| item.as_str().map(str::to_owned))
        .collect()
}
