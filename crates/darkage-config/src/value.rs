//! Typed configuration tree with dot-path traversal.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Nested map of configuration values.
///
/// Keys are kept sorted so the rendered file is stable between writes.
pub type ConfigMap = BTreeMap<String, ConfigValue>;

/// A single value in the configuration tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Explicit absent marker (`null` in the file).
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Integer number.
    Integer(i64),
    /// Unsigned integer above `i64::MAX`, kept exact.
    UInt(u64),
    /// Floating point number, only produced by hand-edited files.
    Float(f64),
    /// Text value.
    String(String),
    /// Ordered sequence.
    List(Vec<ConfigValue>),
    /// Nested document.
    Map(ConfigMap),
}

impl ConfigValue {
    /// Builds a nested map value from key/value pairs.
    pub fn map<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, ConfigValue)>,
        K: Into<String>,
    {
        Self::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Returns `true` for the explicit absent marker.
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the string slice if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer if this is an integer.
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the flag if this is a boolean.
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the string entries if this is a list.
    ///
    /// Non-string entries are skipped.
    pub fn as_string_list(&self) -> Option<Vec<String>> {
        match self {
            Self::List(items) => Some(
                items
                    .iter()
                    .filter_map(Self::as_str)
                    .map(ToString::to_string)
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Returns the nested map if this is a map.
    pub const fn as_map(&self) -> Option<&ConfigMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u16> for ConfigValue {
    fn from(value: u16) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<Vec<String>> for ConfigValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value.into_iter().map(Self::String).collect())
    }
}

impl From<Vec<&str>> for ConfigValue {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(Self::from).collect())
    }
}

impl From<ConfigMap> for ConfigValue {
    fn from(value: ConfigMap) -> Self {
        Self::Map(value)
    }
}

/// Root of the configuration tree.
///
/// The root is always a map; a file whose top level is anything else does
/// not parse as a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument {
    root: ConfigMap,
}

impl ConfigDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Walks a dot path and returns whatever is stored there.
    ///
    /// `None` means the path does not exist: a key is missing or an
    /// intermediate value is not a map. A stored `null` comes back as
    /// `Some(&ConfigValue::Null)`.
    pub fn lookup(&self, path: &str) -> Option<&ConfigValue> {
        let mut keys = path.split('.');
        let mut current = self.root.get(keys.next()?)?;
        for key in keys {
            current = current.as_map()?.get(key)?;
        }
        Some(current)
    }

    /// Like [`lookup`](Self::lookup), but a stored `null` also counts as absent.
    pub fn get(&self, path: &str) -> Option<&ConfigValue> {
        self.lookup(path).filter(|value| !value.is_null())
    }

    /// Assigns a value at a dot path.
    ///
    /// Missing intermediate maps are created; an intermediate value that is
    /// not a map is replaced by one.
    pub fn set(&mut self, path: &str, value: impl Into<ConfigValue>) {
        let keys: Vec<&str> = path.split('.').collect();
        set_in(&mut self.root, &keys, value.into());
    }

    /// Fills in every key of `defaults` that is missing here.
    ///
    /// Existing values are never touched, whatever their type. Returns the
    /// number of values injected.
    pub fn merge_defaults(&mut self, defaults: &Self) -> usize {
        merge_missing(&mut self.root, &defaults.root)
    }

    /// Top-level map.
    pub const fn as_map(&self) -> &ConfigMap {
        &self.root
    }

    /// Number of top-level keys.
    pub fn len(&self) -> usize {
        self.root.len()
    }

    /// Whether the document has no keys.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, ConfigValue)> for ConfigDocument {
    fn from_iter<I: IntoIterator<Item = (K, ConfigValue)>>(iter: I) -> Self {
        Self {
            root: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

fn set_in(map: &mut ConfigMap, keys: &[&str], value: ConfigValue) {
    match keys {
        [] => {}
        [last] => {
            map.insert((*last).to_string(), value);
        }
        [head, rest @ ..] => {
            let slot = map
                .entry((*head).to_string())
                .or_insert_with(|| ConfigValue::Map(ConfigMap::new()));
            if let ConfigValue::Map(child) = &mut *slot {
                set_in(child, rest, value);
                return;
            }
            let mut child = ConfigMap::new();
            set_in(&mut child, rest, value);
            *slot = ConfigValue::Map(child);
        }
    }
}

fn merge_missing(target: &mut ConfigMap, defaults: &ConfigMap) -> usize {
    let mut filled = 0;
    for (key, default) in defaults {
        match target.get_mut(key) {
            None => {
                target.insert(key.clone(), default.clone());
                filled += 1;
            }
            Some(ConfigValue::Map(existing)) => {
                if let ConfigValue::Map(nested) = default {
                    filled += merge_missing(existing, nested);
                }
            }
            Some(_) => {}
        }
    }
    filled
}
