//! The typed RAML document model.
//!
//! Fragments, resources, methods, bodies and parameters are immutable value
//! objects constructed once per aggregation run; each knows how to serialize
//! itself back into the generic tree form for a target dialect.

use std::str::FromStr;

use crate::error::AggregationError;
use crate::tree::{RamlMap, RamlValue};

mod model;
mod resource;

pub use model::{Body, Method, Parameter, Response};
pub use resource::{RamlApi, RamlResource, ResourceFragment, ResourceGroup};

/// The trait marker flagging an endpoint as non-public.
pub const PRIVATE_TRAIT: &str = "private";

/// One of the two supported RAML dialects.
///
/// The dialects differ in their schema keyword (`type` vs `schema`) and in
/// multi-example support; everything else serializes identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RamlVersion {
    /// RAML 1.0: `type` keyword and named `examples` mappings.
    V1_0,
    /// RAML 0.8: `schema` keyword and a single `example` per body.
    V0_8,
}

impl RamlVersion {
    /// The literal header line preceding every emitted document.
    pub fn header(self) -> &'static str {
        match self {
            Self::V1_0 => "#%RAML 1.0",
            Self::V0_8 => "#%RAML 0.8",
        }
    }

    /// The keyword carrying a body's schema reference in this dialect.
    pub fn schema_keyword(self) -> &'static str {
        match self {
            Self::V1_0 => "type",
            Self::V0_8 => "schema",
        }
    }

    /// Whether the dialect can carry several named examples per body.
    pub fn supports_multiple_examples(self) -> bool {
        matches!(self, Self::V1_0)
    }
}

impl FromStr for RamlVersion {
    type Err = AggregationError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "1.0" => Ok(Self::V1_0),
            "0.8" => Ok(Self::V0_8),
            other => Err(AggregationError::UnsupportedVersion {
                version: other.to_owned(),
            }),
        }
    }
}

impl std::fmt::Display for RamlVersion {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::V1_0 => "1.0",
            Self::V0_8 => "0.8",
        };
        formatter.write_str(text)
    }
}

/// Serialization of a model value into the generic tree form.
pub trait ToRamlMap {
    /// Serializes this value for the given dialect.
    fn to_raml_map(&self, version: RamlVersion) -> RamlMap;
}

/// Flat-merges the serialized form of every item into one map.
pub(crate) fn collect_maps<T: ToRamlMap>(items: &[T], version: RamlVersion) -> RamlMap {
    let mut map = RamlMap::new();
    for item in items {
        map.extend(item.to_raml_map(version));
    }
    map
}

/// Wraps the items' flat-merged form under `key`, or returns `None` when
/// there is nothing to serialize (the key is then omitted from output).
pub(crate) fn keyed_maps<T: ToRamlMap>(
    key: &str,
    items: &[T],
    version: RamlVersion,
) -> Option<(String, RamlValue)> {
    if items.is_empty() {
        None
    } else {
        Some((
            key.to_owned(),
            RamlValue::Mapping(collect_maps(items, version)),
        ))
    }
}
