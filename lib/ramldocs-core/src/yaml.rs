//! Parsing and serialization of RAML documents.
//!
//! This module is the boundary to the YAML ecosystem: it turns document text
//! into the generic tree of [`crate::tree`] and back, preserving `!include`
//! tagged scalars as [`Include`] values. The round-trip is lossless for
//! includes; all other scalars pass through as plain YAML scalars.

use std::fs;
use std::path::Path;

use serde_yaml::Value;
use serde_yaml::value::{Tag, TaggedValue};

use crate::api::{RamlApi, ToRamlMap};
use crate::error::AggregationError;
use crate::tree::{Include, RamlMap, RamlValue};

fn include_tag() -> Tag {
    Tag::new("include")
}

/// Parses RAML fragment text into a generic document tree.
///
/// The top-level node must be a mapping. Scalars tagged `!include` become
/// [`Include`] values; numeric mapping keys (response status codes) are
/// normalized to their decimal string form.
pub fn parse_fragment(text: &str) -> Result<RamlMap, AggregationError> {
    let value: Value = serde_yaml::from_str(text)?;
    match value {
        Value::Mapping(mapping) => mapping_to_tree(mapping),
        _ => Err(AggregationError::MalformedDocument {
            message: "top-level node must be a mapping".to_owned(),
        }),
    }
}

/// Parses a RAML fragment file, surfacing the offending path on failure.
pub fn parse_fragment_file(path: &Path) -> Result<RamlMap, AggregationError> {
    let text = fs::read_to_string(path).map_err(|source| AggregationError::io(path, source))?;
    parse_fragment(&text).map_err(|error| AggregationError::DocumentParse {
        path: path.display().to_string(),
        message: error.to_string(),
    })
}

/// Serializes a document tree back to YAML text.
///
/// [`Include`] values are emitted as `!include` tagged scalars and string
/// keys consisting solely of ASCII digits become integer keys, so response
/// status codes round-trip unquoted.
pub fn to_yaml_string(tree: &RamlMap) -> Result<String, AggregationError> {
    let value = tree_to_value(tree);
    Ok(serde_yaml::to_string(&value)?)
}

/// Writes a document tree to `path`, preceded by an optional literal header
/// line (the RAML dialect marker).
pub fn write_file(
    path: &Path,
    tree: &RamlMap,
    header_line: Option<&str>,
) -> Result<(), AggregationError> {
    let body = to_yaml_string(tree)?;
    let text = match header_line {
        Some(header) => format!("{header}\n{body}"),
        None => body,
    };
    fs::write(path, text).map_err(|source| AggregationError::io(path, source))
}

/// Writes the root document and one document per resource group.
///
/// `group_file_name` maps a group's first path part to its output file name;
/// the root document references each group file with an `!include` entry.
/// Every emitted document starts with the dialect's header line.
pub fn write_api(
    api: &RamlApi,
    output_dir: &Path,
    api_file_name: &str,
    group_file_name: impl Fn(&str) -> String,
) -> Result<(), AggregationError> {
    let header = api.version().header();
    write_file(
        &output_dir.join(api_file_name),
        &api.to_main_file_map(&group_file_name),
        Some(header),
    )?;
    for group in api.resource_groups() {
        write_file(
            &output_dir.join(group_file_name(group.first_path_part())),
            &group.to_raml_map(api.version()),
            Some(header),
        )?;
    }
    Ok(())
}

fn mapping_to_tree(mapping: serde_yaml::Mapping) -> Result<RamlMap, AggregationError> {
    let mut tree = RamlMap::with_capacity(mapping.len());
    for (key, value) in mapping {
        tree.insert(key_to_string(&key)?, value_to_tree(value)?);
    }
    Ok(tree)
}

fn key_to_string(key: &Value) -> Result<String, AggregationError> {
    match key {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(AggregationError::MalformedDocument {
            message: format!("mapping keys must be strings or numbers, got {other:?}"),
        }),
    }
}

fn value_to_tree(value: Value) -> Result<RamlValue, AggregationError> {
    let converted = match value {
        Value::Null => RamlValue::Null,
        Value::Bool(flag) => RamlValue::Bool(flag),
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                RamlValue::Int(int)
            } else if let Some(float) = number.as_f64() {
                RamlValue::Float(float)
            } else {
                return Err(AggregationError::MalformedDocument {
                    message: format!("unrepresentable number: {number}"),
                });
            }
        }
        Value::String(text) => RamlValue::Str(text),
        Value::Sequence(items) => RamlValue::Sequence(
            items
                .into_iter()
                .map(value_to_tree)
                .collect::<Result<_, _>>()?,
        ),
        Value::Mapping(mapping) => RamlValue::Mapping(mapping_to_tree(mapping)?),
        Value::Tagged(tagged) => {
            if tagged.tag == include_tag() {
                match tagged.value {
                    Value::String(location) => RamlValue::Include(Include::new(location)),
                    other => {
                        return Err(AggregationError::MalformedDocument {
                            message: format!("!include expects a scalar location, got {other:?}"),
                        });
                    }
                }
            } else {
                return Err(AggregationError::MalformedDocument {
                    message: format!("unsupported tag: {}", tagged.tag),
                });
            }
        }
    };
    Ok(converted)
}

fn tree_to_value(tree: &RamlMap) -> Value {
    let mut mapping = serde_yaml::Mapping::with_capacity(tree.len());
    for (key, value) in tree {
        mapping.insert(string_to_key(key), raml_to_value(value));
    }
    Value::Mapping(mapping)
}

fn string_to_key(key: &str) -> Value {
    // emit status codes as integer keys; "007"-style strings stay strings
    match key.parse::<u64>() {
        Ok(number) if number.to_string() == key => Value::Number(number.into()),
        _ => Value::String(key.to_owned()),
    }
}

fn raml_to_value(value: &RamlValue) -> Value {
    match value {
        RamlValue::Null => Value::Null,
        RamlValue::Bool(flag) => Value::Bool(*flag),
        RamlValue::Int(int) => Value::Number((*int).into()),
        RamlValue::Float(float) => Value::Number((*float).into()),
        RamlValue::Str(text) => Value::String(text.clone()),
        RamlValue::Include(include) => Value::Tagged(Box::new(TaggedValue {
            tag: include_tag(),
            value: Value::String(include.location().to_owned()),
        })),
        RamlValue::Sequence(items) => Value::Sequence(items.iter().map(raml_to_value).collect()),
        RamlValue::Mapping(mapping) => tree_to_value(mapping),
    }
}
