//! Structured fragments, resources and the top-level API document.

use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::error::AggregationError;
use crate::fragment::first_path_part;
use crate::schema::JsonSchemaMerger;
use crate::tree::{Include, RamlMap, RamlValue, raml_map};

use super::{Body, Method, Parameter, RamlVersion, Response, ToRamlMap, collect_maps, keyed_maps};

/// One parsed endpoint fragment in structured form: one path, one method.
///
/// The fragment's `id` is derived from its source location; it must be
/// unique per fragment and is used as the merge tie-break.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceFragment {
    /// Stable identifier derived from the fragment's source location.
    pub id: String,
    /// The documented resource path.
    pub path: String,
    /// The single request method the fragment documents.
    pub method: Method,
    /// URI parameters declared alongside the method.
    pub uri_parameters: Vec<Parameter>,
}

impl ResourceFragment {
    /// Builds a structured fragment from a parsed document tree.
    ///
    /// The document must have exactly one top-level key (the path) whose
    /// value holds exactly one method entry besides an optional
    /// `uriParameters` sibling; any other shape is a fatal violation.
    pub fn from_yaml(id: impl Into<String>, doc: &RamlMap) -> Result<Self, AggregationError> {
        let id = id.into();
        match parse_fragment_parts(doc) {
            Ok((path, method, uri_parameters)) => Ok(Self {
                id,
                path,
                method,
                uri_parameters,
            }),
            Err(error) => Err(AggregationError::InvalidFragment {
                id,
                message: error.to_string(),
            }),
        }
    }

    /// The leading `/segment` of the path, or `/` when the path has none.
    pub fn first_path_part(&self) -> String {
        first_path_part(&self.path)
    }

    /// Whether the fragment documents a non-public endpoint.
    pub fn is_private(&self) -> bool {
        self.method.is_private()
    }
}

fn malformed(message: impl Into<String>) -> AggregationError {
    AggregationError::MalformedDocument {
        message: message.into(),
    }
}

fn single_entry<'a>(
    map: &'a RamlMap,
    what: &str,
) -> Result<(&'a str, &'a RamlValue), AggregationError> {
    let mut entries = map.iter();
    match (entries.next(), entries.next()) {
        (Some((key, value)), None) => Ok((key.as_str(), value)),
        _ => Err(malformed(format!("{what} must have exactly one entry"))),
    }
}

fn parse_fragment_parts(
    doc: &RamlMap,
) -> Result<(String, Method, Vec<Parameter>), AggregationError> {
    let (path, value) = single_entry(doc, "a fragment document")?;
    let values = value
        .as_mapping()
        .ok_or_else(|| malformed("the path entry must be a mapping"))?;
    let uri_parameters = match values.get("uriParameters") {
        Some(parameters) => parse_parameters(
            parameters
                .as_mapping()
                .ok_or_else(|| malformed("uriParameters must be a mapping"))?,
        )?,
        None => Vec::new(),
    };
    let methods: Vec<(&String, &RamlValue)> = values
        .iter()
        .filter(|(key, _)| key.as_str() != "uriParameters")
        .collect();
    match methods.as_slice() {
        [(name, content)] => {
            let method = parse_method(name, content)?;
            Ok((path.to_owned(), method, uri_parameters))
        }
        _ => Err(malformed("fragment content must have exactly one method key")),
    }
}

fn parse_method(name: &str, content: &RamlValue) -> Result<Method, AggregationError> {
    let values = content
        .as_mapping()
        .ok_or_else(|| malformed(format!("method '{name}' must be a mapping")))?;
    let description = values
        .get("description")
        .and_then(RamlValue::as_str)
        .map(ToOwned::to_owned);
    let query_parameters = match values.get("queryParameters").and_then(RamlValue::as_mapping) {
        Some(parameters) => parse_parameters(parameters)?,
        None => Vec::new(),
    };
    let traits = string_sequence(values.get("is"));
    let secured_by = string_sequence(values.get("securedBy"));
    let request_bodies = match values.get("body").and_then(RamlValue::as_mapping) {
        Some(body) => vec![parse_body(body)?],
        None => Vec::new(),
    };
    let responses = match values.get("responses").and_then(RamlValue::as_mapping) {
        Some(responses) => responses
            .iter()
            .map(|(status, response)| parse_response(status, response))
            .collect::<Result<_, _>>()?,
        None => Vec::new(),
    };
    Ok(Method {
        method: name.to_owned(),
        description,
        query_parameters,
        traits,
        secured_by,
        request_bodies,
        responses,
    })
}

fn string_sequence(value: Option<&RamlValue>) -> Vec<String> {
    value
        .and_then(RamlValue::as_sequence)
        .map(|items| {
            items
                .iter()
                .filter_map(RamlValue::as_str)
                .map(ToOwned::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_parameters(map: &RamlMap) -> Result<Vec<Parameter>, AggregationError> {
    map.iter()
        .map(|(name, value)| {
            let entry = value
                .as_mapping()
                .ok_or_else(|| malformed(format!("parameter '{name}' must be a mapping")))?;
            let description = entry
                .get("description")
                .and_then(RamlValue::as_str)
                .ok_or_else(|| malformed(format!("parameter '{name}' has no description")))?;
            let param_type = entry
                .get("type")
                .and_then(RamlValue::as_str)
                .ok_or_else(|| malformed(format!("parameter '{name}' has no type")))?;
            Ok(Parameter {
                name: name.clone(),
                description: description.to_owned(),
                param_type: param_type.to_owned(),
            })
        })
        .collect()
}

fn parse_body(map: &RamlMap) -> Result<Body, AggregationError> {
    let (content_type, value) = single_entry(map, "a body")?;
    let values = value
        .as_mapping()
        .ok_or_else(|| malformed(format!("body '{content_type}' must be a mapping")))?;
    let example = values
        .get("example")
        .and_then(RamlValue::as_include)
        .cloned();
    // fragments carry "schema" on disk; "type" appears after the 1.0 rename
    let schema = values
        .get("schema")
        .or_else(|| values.get("type"))
        .and_then(RamlValue::as_include)
        .cloned();
    Ok(Body {
        content_type: content_type.to_owned(),
        example,
        schema,
        examples: Vec::new(),
    })
}

fn parse_response(status: &str, value: &RamlValue) -> Result<Response, AggregationError> {
    let parsed_status = status
        .parse::<u16>()
        .map_err(|_| malformed(format!("response status '{status}' is not a number")))?;
    let bodies = match value.get("body").and_then(RamlValue::as_mapping) {
        Some(body) => vec![parse_body(body)?],
        None => Vec::new(),
    };
    Ok(Response {
        status: parsed_status,
        bodies,
    })
}

/// All methods of one resource path, merged from its fragments.
#[derive(Debug, Clone, PartialEq)]
pub struct RamlResource {
    /// The resource path, relative to its group prefix after grouping.
    pub path: String,
    /// The methods in first-seen order.
    pub methods: Vec<Method>,
    /// URI parameters of the resource.
    pub uri_parameters: Vec<Parameter>,
}

impl RamlResource {
    /// Merges all fragments sharing one path into a single resource.
    ///
    /// Fails fast when fragments disagree on the path. Fragments are grouped
    /// by method in first-seen order; within a method group the fragment
    /// with the shortest id seeds the non-body fields, bodies with the same
    /// content type have their examples concatenated and their schemas
    /// merged, and responses merge per status the same way.
    pub fn from_fragments(
        fragments: &[ResourceFragment],
        schema_merger: &JsonSchemaMerger,
    ) -> Result<Self, AggregationError> {
        let Some(first) = fragments.first() else {
            return Err(malformed("cannot build a resource from an empty fragment set"));
        };
        if let Some(other) = fragments.iter().find(|fragment| fragment.path != first.path) {
            return Err(AggregationError::InconsistentPath {
                expected: first.path.clone(),
                actual: other.path.clone(),
            });
        }

        let mut by_method: IndexMap<&str, Vec<&ResourceFragment>> = IndexMap::new();
        for fragment in fragments {
            by_method
                .entry(fragment.method.method.as_str())
                .or_default()
                .push(fragment);
        }

        let mut methods = Vec::with_capacity(by_method.len());
        for (_, group) in by_method {
            let mut ordered = group;
            ordered.sort_by_key(|fragment| fragment.id.len());
            let request_bodies: Vec<&Body> = ordered
                .iter()
                .filter_map(|fragment| fragment.method.request_bodies.first())
                .collect();
            let responses: Vec<&Response> = ordered
                .iter()
                .flat_map(|fragment| fragment.method.responses.iter())
                .collect();
            let seed = &ordered[0].method;
            methods.push(Method {
                request_bodies: merge_bodies_with_same_content_type(&request_bodies, schema_merger)?,
                responses: merge_responses_with_same_status(&responses, schema_merger)?,
                ..seed.clone()
            });
        }

        Ok(Self {
            path: first.path.clone(),
            methods,
            uri_parameters: first.uri_parameters.clone(),
        })
    }
}

fn merge_bodies_with_same_content_type(
    bodies: &[&Body],
    schema_merger: &JsonSchemaMerger,
) -> Result<Vec<Body>, AggregationError> {
    let mut by_content_type: IndexMap<&str, Vec<&Body>> = IndexMap::new();
    for body in bodies {
        by_content_type
            .entry(body.content_type.as_str())
            .or_default()
            .push(body);
    }
    let mut merged = Vec::with_capacity(by_content_type.len());
    for (content_type, group) in by_content_type {
        let examples: Vec<Include> = group
            .iter()
            .filter_map(|body| body.example.clone())
            .collect();
        let schemas: Vec<Include> = group
            .iter()
            .filter_map(|body| body.schema.clone())
            .collect();
        merged.push(Body {
            content_type: content_type.to_owned(),
            example: None,
            schema: schema_merger.merge_schemas(&schemas)?,
            examples,
        });
    }
    Ok(merged)
}

fn merge_responses_with_same_status(
    responses: &[&Response],
    schema_merger: &JsonSchemaMerger,
) -> Result<Vec<Response>, AggregationError> {
    let mut by_status: IndexMap<u16, Vec<&Body>> = IndexMap::new();
    for response in responses {
        by_status
            .entry(response.status)
            .or_default()
            .extend(response.bodies.iter());
    }
    let mut merged = Vec::with_capacity(by_status.len());
    for (status, bodies) in by_status {
        merged.push(Response {
            status,
            bodies: merge_bodies_with_same_content_type(&bodies, schema_merger)?,
        });
    }
    Ok(merged)
}

impl ToRamlMap for RamlResource {
    fn to_raml_map(&self, version: RamlVersion) -> RamlMap {
        let mut inner = RamlMap::new();
        if let Some((key, value)) = keyed_maps("uriParameters", &self.uri_parameters, version) {
            inner.insert(key, value);
        }
        inner.extend(collect_maps(&self.methods, version));
        if self.path.is_empty() {
            inner
        } else {
            raml_map! { self.path.clone() => inner }
        }
    }
}

/// Resources sharing a first path segment, serialized into one group file.
///
/// Construction strips the shared prefix from every member's path and sorts
/// by remaining-path length so parent resources are emitted before nested
/// ones.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceGroup {
    first_path_part: String,
    resources: Vec<RamlResource>,
}

impl ResourceGroup {
    /// Creates a group, stripping `first_path_part` from each resource.
    pub fn new(first_path_part: impl Into<String>, resources: Vec<RamlResource>) -> Self {
        let first_path_part = first_path_part.into();
        let mut resources: Vec<RamlResource> = resources
            .into_iter()
            .map(|resource| {
                let path = resource
                    .path
                    .strip_prefix(first_path_part.as_str())
                    .unwrap_or(&resource.path)
                    .to_owned();
                RamlResource { path, ..resource }
            })
            .collect();
        resources.sort_by_key(|resource| resource.path.len());
        Self {
            first_path_part,
            resources,
        }
    }

    /// The shared leading `/segment` of the group.
    pub fn first_path_part(&self) -> &str {
        &self.first_path_part
    }

    /// The member resources, parents first.
    pub fn resources(&self) -> &[RamlResource] {
        &self.resources
    }
}

impl ToRamlMap for ResourceGroup {
    fn to_raml_map(&self, version: RamlVersion) -> RamlMap {
        collect_maps(&self.resources, version)
    }
}

/// The aggregated API: title, optional base URI and all resource groups.
///
/// A public-only variant of the document is produced by filtering private
/// fragments before calling [`RamlApi::from_fragments`]; the assembly
/// itself is identical.
#[derive(Debug, Clone, PartialEq)]
pub struct RamlApi {
    title: String,
    base_uri: Option<String>,
    version: RamlVersion,
    resource_groups: Vec<ResourceGroup>,
}

impl RamlApi {
    /// Creates an API document; groups are ordered by their path prefix for
    /// stable file emission.
    pub fn new(
        title: impl Into<String>,
        base_uri: Option<String>,
        version: RamlVersion,
        mut resource_groups: Vec<ResourceGroup>,
    ) -> Self {
        resource_groups.sort_by(|left, right| left.first_path_part.cmp(&right.first_path_part));
        Self {
            title: title.into(),
            base_uri,
            version,
            resource_groups,
        }
    }

    /// Assembles an API from structured fragments: partitions them by first
    /// path segment, merges fragments sharing a full path into resources,
    /// and groups the resources.
    pub fn from_fragments(
        title: impl Into<String>,
        base_uri: Option<String>,
        version: RamlVersion,
        fragments: &[ResourceFragment],
        schema_merger: &JsonSchemaMerger,
    ) -> Result<Self, AggregationError> {
        let mut by_prefix: BTreeMap<String, IndexMap<&str, Vec<ResourceFragment>>> =
            BTreeMap::new();
        for fragment in fragments {
            by_prefix
                .entry(fragment.first_path_part())
                .or_default()
                .entry(fragment.path.as_str())
                .or_default()
                .push(fragment.clone());
        }
        let mut groups = Vec::with_capacity(by_prefix.len());
        for (prefix, by_path) in by_prefix {
            let mut resources = Vec::with_capacity(by_path.len());
            for (_, same_path) in by_path {
                resources.push(RamlResource::from_fragments(&same_path, schema_merger)?);
            }
            groups.push(ResourceGroup::new(prefix, resources));
        }
        Ok(Self::new(title, base_uri, version, groups))
    }

    /// The API title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The optional base URI.
    pub fn base_uri(&self) -> Option<&str> {
        self.base_uri.as_deref()
    }

    /// The dialect the API serializes to.
    pub fn version(&self) -> RamlVersion {
        self.version
    }

    /// The resource groups, ordered by path prefix.
    pub fn resource_groups(&self) -> &[ResourceGroup] {
        &self.resource_groups
    }

    /// The root document: title, optional base URI, and one `!include`
    /// entry per resource group pointing at its generated file.
    pub fn to_main_file_map(&self, group_file_name: impl Fn(&str) -> String) -> RamlMap {
        let mut map = raml_map! { "title" => self.title.clone() };
        if let Some(base_uri) = &self.base_uri {
            map.insert("baseUri".to_owned(), RamlValue::from(base_uri.clone()));
        }
        for group in &self.resource_groups {
            map.insert(
                group.first_path_part.clone(),
                RamlValue::Include(Include::new(group_file_name(&group.first_path_part))),
            );
        }
        map
    }
}
