//! Raw fragments and the grouping/merging engine operating on them.
//!
//! A raw fragment keeps its content as a generic document tree; the engine
//! merges colliding fragments tree-to-tree without going through the typed
//! model in [`crate::api`]. Both forms exist because output documents splice
//! arbitrary fragment content verbatim, while the typed model gives callers
//! a structured view of the same data.

use std::ffi::OsStr;
use std::path::Path;

use crate::api::PRIVATE_TRAIT;
use crate::error::AggregationError;
use crate::tree::{RamlMap, RamlValue, TreeExt};
use crate::yaml;

mod processor;

pub use processor::{FragmentGroup, FragmentProcessor};

/// The leading `/segment` of a path, or `/` when there is no non-empty
/// segment.
pub(crate) fn first_path_part(path: &str) -> String {
    path.split('/')
        .find(|segment| !segment.is_empty())
        .map_or_else(|| "/".to_owned(), |segment| format!("/{segment}"))
}

/// One documented endpoint in raw tree form.
#[derive(Debug, Clone, PartialEq)]
pub struct RamlFragment {
    /// Stable identifier derived from the fragment's source location.
    pub id: String,
    /// The documented resource path.
    pub path: String,
    /// The content below the path key, including `uriParameters`.
    pub content: RamlMap,
}

impl RamlFragment {
    /// Creates a fragment from already-split parts.
    pub fn new(id: impl Into<String>, path: impl Into<String>, content: RamlMap) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            content,
        }
    }

    /// Splits a parsed document into path and content.
    ///
    /// The document must have exactly one top-level key (the path) holding
    /// a mapping.
    pub fn from_yaml(id: impl Into<String>, doc: &RamlMap) -> Result<Self, AggregationError> {
        let id = id.into();
        let mut entries = doc.iter();
        match (entries.next(), entries.next()) {
            (Some((path, RamlValue::Mapping(content))), None) => {
                Ok(Self::new(id, path.clone(), content.clone()))
            }
            _ => Err(AggregationError::InvalidFragment {
                id,
                message: "a fragment must have exactly one path entry holding a mapping"
                    .to_owned(),
            }),
        }
    }

    /// Parses a fragment file; the id is the parent directory's name, which
    /// is unique per snippet under the restdocs layout.
    pub fn from_file(file: &Path) -> Result<Self, AggregationError> {
        let id = file
            .parent()
            .and_then(Path::file_name)
            .and_then(OsStr::to_str)
            .ok_or_else(|| AggregationError::InvalidFragment {
                id: file.display().to_string(),
                message: "cannot derive an id from the parent directory".to_owned(),
            })?;
        let doc = yaml::parse_fragment_file(file)?;
        Self::from_yaml(id, &doc)
    }

    /// The leading `/segment` of the path, or `/` when the path has none.
    pub fn first_path_part(&self) -> String {
        first_path_part(&self.path)
    }

    /// Whether any `is` entry anywhere in the content carries the private
    /// trait marker.
    pub fn is_private(&self) -> bool {
        self.content
            .any_match(&|key, value| key == "is" && value.contains_str(PRIVATE_TRAIT))
    }

    /// Returns a copy with every `schema` entry renamed to `type`, the
    /// keyword rename required when emitting the 1.0 dialect.
    pub fn replace_schema_with_type(&self) -> Self {
        Self {
            content: self.content.replace_key("schema", "type"),
            ..self.clone()
        }
    }

    /// The single request method key of the content.
    ///
    /// A `uriParameters` sibling is tolerated; any other extra key violates
    /// the one-method contract.
    pub fn request_method(&self) -> Result<&str, AggregationError> {
        let methods: Vec<&str> = self
            .content
            .keys()
            .map(String::as_str)
            .filter(|key| *key != "uriParameters")
            .collect();
        match methods.as_slice() {
            [method] => Ok(method),
            _ => Err(AggregationError::InvalidFragment {
                id: self.id.clone(),
                message: "fragment content must have exactly one method key".to_owned(),
            }),
        }
    }
}
