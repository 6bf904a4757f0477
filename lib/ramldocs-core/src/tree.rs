//! Generic RAML document trees and recursive operations over them.
//!
//! A parsed fragment is an ordered mapping from string keys to [`RamlValue`]s.
//! The sum type gives every traversal site an exhaustive match instead of the
//! unchecked casts an untyped map would require.

use indexmap::IndexMap;

/// An opaque reference to an external file.
///
/// Serialized as a `!include` tagged scalar and never inlined into the
/// document tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Include {
    location: String,
}

impl Include {
    /// Creates a reference to the given location.
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }

    /// The referenced file's location, relative to the document that holds it.
    pub fn location(&self) -> &str {
        &self.location
    }
}

impl std::fmt::Display for Include {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "!include {}", self.location)
    }
}

/// An ordered mapping from string keys to document values.
///
/// Response status codes are carried as their decimal string form; the YAML
/// layer converts them back to integer keys on output.
pub type RamlMap = IndexMap<String, RamlValue>;

/// One node of a RAML document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum RamlValue {
    /// An explicit null, e.g. an empty `description:` entry.
    Null,
    /// A boolean scalar.
    Bool(bool),
    /// An integer scalar.
    Int(i64),
    /// A floating point scalar.
    Float(f64),
    /// A string scalar.
    Str(String),
    /// A `!include` file reference.
    Include(Include),
    /// A sequence of values.
    Sequence(Vec<RamlValue>),
    /// A nested ordered mapping.
    Mapping(RamlMap),
}

impl RamlValue {
    /// Returns the string slice if this is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the nested mapping if this is a mapping.
    pub fn as_mapping(&self) -> Option<&RamlMap> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the file reference if this is an include.
    pub fn as_include(&self) -> Option<&Include> {
        match self {
            Self::Include(include) => Some(include),
            _ => None,
        }
    }

    /// Returns the items if this is a sequence.
    pub fn as_sequence(&self) -> Option<&[RamlValue]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Looks up `key` if this is a mapping.
    pub fn get(&self, key: &str) -> Option<&RamlValue> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Returns `true` if this is a sequence containing the given string.
    pub fn contains_str(&self, needle: &str) -> bool {
        self.as_sequence()
            .is_some_and(|items| items.iter().any(|item| item.as_str() == Some(needle)))
    }
}

impl From<&str> for RamlValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for RamlValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for RamlValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for RamlValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Include> for RamlValue {
    fn from(value: Include) -> Self {
        Self::Include(value)
    }
}

impl From<RamlMap> for RamlValue {
    fn from(value: RamlMap) -> Self {
        Self::Mapping(value)
    }
}

impl From<Vec<RamlValue>> for RamlValue {
    fn from(value: Vec<RamlValue>) -> Self {
        Self::Sequence(value)
    }
}

/// Builds a [`RamlMap`] from `key => value` pairs, converting values with
/// [`RamlValue::from`].
macro_rules! raml_map {
    () => { $crate::tree::RamlMap::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::tree::RamlMap::new();
        $( map.insert(String::from($key), $crate::tree::RamlValue::from($value)); )+
        map
    }};
}
pub(crate) use raml_map;

/// Recursive, non-mutating operations over document trees.
///
/// All traversal happens in the tree's natural key order so results are
/// reproducible across runs.
pub trait TreeExt {
    /// Returns `true` if `predicate` holds for any entry anywhere in the
    /// tree, descending into mapping values in document order.
    /// Short-circuits on the first match.
    fn any_match<P>(&self, predicate: &P) -> bool
    where
        P: Fn(&str, &RamlValue) -> bool;

    /// Depth-first, pre-order search for the first entry with the given key.
    fn find_first(&self, key: &str) -> Option<&RamlValue>;

    /// Like [`TreeExt::find_first`], but does not descend into entries whose
    /// key is in `exclude_keys`.
    fn find_first_excluding(&self, key: &str, exclude_keys: &[&str]) -> Option<&RamlValue>;

    /// Returns a new tree with every entry keyed `old_key` renamed to
    /// `new_key`. The input tree is not mutated.
    fn replace_key(&self, old_key: &str, new_key: &str) -> RamlMap;

    /// Returns a new tree where every entry keyed `old_key` is replaced with
    /// `(new_key, transform(value))`. Recursion skips mapping entries whose
    /// key is in `exclude_keys`; all other entries pass through unchanged.
    fn replace<F>(
        &self,
        old_key: &str,
        new_key: &str,
        transform: &F,
        exclude_keys: &[&str],
    ) -> RamlMap
    where
        F: Fn(&RamlValue) -> RamlValue;
}

impl TreeExt for RamlMap {
    fn any_match<P>(&self, predicate: &P) -> bool
    where
        P: Fn(&str, &RamlValue) -> bool,
    {
        self.iter().any(|(key, value)| {
            if predicate(key, value) {
                return true;
            }
            match value {
                RamlValue::Mapping(nested) => nested.any_match(predicate),
                _ => false,
            }
        })
    }

    fn find_first(&self, key: &str) -> Option<&RamlValue> {
        self.find_first_excluding(key, &[])
    }

    fn find_first_excluding(&self, key: &str, exclude_keys: &[&str]) -> Option<&RamlValue> {
        for (entry_key, value) in self {
            if entry_key == key {
                return Some(value);
            }
            if exclude_keys.contains(&entry_key.as_str()) {
                continue;
            }
            if let RamlValue::Mapping(nested) = value {
                if let Some(found) = nested.find_first_excluding(key, exclude_keys) {
                    return Some(found);
                }
            }
        }
        None
    }

    fn replace_key(&self, old_key: &str, new_key: &str) -> RamlMap {
        self.replace(old_key, new_key, &|value| value.clone(), &[])
    }

    fn replace<F>(
        &self,
        old_key: &str,
        new_key: &str,
        transform: &F,
        exclude_keys: &[&str],
    ) -> RamlMap
    where
        F: Fn(&RamlValue) -> RamlValue,
    {
        let mut result = RamlMap::with_capacity(self.len());
        for (key, value) in self {
            if key == old_key {
                result.insert(new_key.to_owned(), transform(value));
                continue;
            }
            let descended = match value {
                RamlValue::Mapping(nested) if !exclude_keys.contains(&key.as_str()) => {
                    RamlValue::Mapping(nested.replace(old_key, new_key, transform, exclude_keys))
                }
                other => other.clone(),
            };
            result.insert(key.clone(), descended);
        }
        result
    }
}
