//! Aggregation of per-endpoint RAML documentation fragments into a single,
//! deduplicated, hierarchically organized API description.
//!
//! Test-generated snippets document one resource path and one request method
//! each. This crate groups them by path prefix, merges fragments colliding
//! on path and method (aggregating examples under stable keys and
//! deep-merging referenced JSON Schema documents), and writes one group
//! document per path prefix plus a root document referencing them, in
//! either the RAML 1.0 or RAML 0.8 dialect.
//!
//! # Example
//!
//! ```no_run
//! use ramldocs_core::{AggregationConfig, Aggregator};
//!
//! # fn main() -> Result<(), ramldocs_core::AggregationError> {
//! let config = AggregationConfig {
//!     api_title: "Shop API".to_owned(),
//!     api_base_uri: Some("https://api.example.com".to_owned()),
//!     raml_version: "1.0".parse()?,
//!     separate_public_api: true,
//!     snippets_directory: "build/generated-snippets".into(),
//!     output_directory: "build/ramldoc".into(),
//!     output_file_name_prefix: "api".to_owned(),
//! };
//! Aggregator::new(config).aggregate()?;
//! # Ok(())
//! # }
//! ```
//!
//! Beside the pipeline driven by [`Aggregator`], the [`api`] module offers a
//! typed document model ([`RamlApi`], [`RamlResource`]) for callers that
//! want to inspect or assemble an API programmatically instead of going
//! through raw document trees.

pub mod aggregate;
pub mod api;
mod error;
pub mod fragment;
pub mod schema;
pub mod tree;
pub mod yaml;

pub use aggregate::{AggregationConfig, Aggregator};
pub use api::{
    Body, Method, Parameter, RamlApi, RamlResource, RamlVersion, ResourceFragment, ResourceGroup,
    Response, ToRamlMap,
};
pub use error::AggregationError;
pub use fragment::{FragmentGroup, FragmentProcessor, RamlFragment};
pub use schema::JsonSchemaMerger;
pub use tree::{Include, RamlMap, RamlValue, TreeExt};
