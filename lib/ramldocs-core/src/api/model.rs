//! Method, body, response and parameter value objects.

use crate::tree::{Include, RamlMap, RamlValue, raml_map};

use super::{RamlVersion, ToRamlMap, collect_maps, keyed_maps};

/// A named URI or query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// The parameter name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// The RAML parameter type, e.g. `string` or `integer`.
    pub param_type: String,
}

impl ToRamlMap for Parameter {
    fn to_raml_map(&self, _version: RamlVersion) -> RamlMap {
        raml_map! {
            self.name.clone() => raml_map! {
                "description" => self.description.clone(),
                "type" => self.param_type.clone(),
            },
        }
    }
}

/// A request or response body for one content type.
///
/// `example` holds the single example a freshly parsed fragment carries;
/// merging moves examples into `examples`, which is what serialization
/// reads. Under the restdocs naming scheme an example file is called
/// `<fragment-id>-request.json` or `<fragment-id>-response.json`, so the
/// keys of the emitted `examples` mapping are the originating fragment ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body {
    /// The content type, e.g. `application/hal+json`.
    pub content_type: String,
    /// The single example of an unmerged fragment body.
    pub example: Option<Include>,
    /// Reference to the body's JSON Schema document.
    pub schema: Option<Include>,
    /// Aggregated examples of all fragments merged into this body.
    pub examples: Vec<Include>,
}

impl Body {
    fn example_key(location: &str) -> String {
        location
            .replace("-request.json", "")
            .replace("-response.json", "")
    }
}

impl ToRamlMap for Body {
    fn to_raml_map(&self, version: RamlVersion) -> RamlMap {
        let mut inner = RamlMap::new();
        if version.supports_multiple_examples() {
            if !self.examples.is_empty() {
                let keyed: RamlMap = self
                    .examples
                    .iter()
                    .map(|include| {
                        (
                            Self::example_key(include.location()),
                            RamlValue::Include(include.clone()),
                        )
                    })
                    .collect();
                inner.insert("examples".to_owned(), RamlValue::Mapping(keyed));
            }
        } else if let Some(first) = self.examples.first() {
            inner.insert("example".to_owned(), RamlValue::Include(first.clone()));
        }
        if let Some(schema) = &self.schema {
            inner.insert(
                version.schema_keyword().to_owned(),
                RamlValue::Include(schema.clone()),
            );
        }
        raml_map! { self.content_type.clone() => inner }
    }
}

/// A response for one status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// The HTTP status code.
    pub status: u16,
    /// The response bodies, one per content type.
    pub bodies: Vec<Body>,
}

impl ToRamlMap for Response {
    fn to_raml_map(&self, version: RamlVersion) -> RamlMap {
        raml_map! { self.status.to_string() => collect_maps(&self.bodies, version) }
    }
}

/// One request method of a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    /// The request method name, e.g. `get`.
    pub method: String,
    /// Optional endpoint description.
    pub description: Option<String>,
    /// Query parameters.
    pub query_parameters: Vec<Parameter>,
    /// Applied traits; containing [`super::PRIVATE_TRAIT`] marks the
    /// endpoint non-public.
    pub traits: Vec<String>,
    /// Security schemes protecting the endpoint.
    pub secured_by: Vec<String>,
    /// Request bodies, one per content type.
    pub request_bodies: Vec<Body>,
    /// Responses, one per status code.
    pub responses: Vec<Response>,
}

impl Method {
    /// Creates a method with the given name and no further content.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            description: None,
            query_parameters: Vec::new(),
            traits: Vec::new(),
            secured_by: Vec::new(),
            request_bodies: Vec::new(),
            responses: Vec::new(),
        }
    }

    /// Whether the method carries the private trait.
    pub fn is_private(&self) -> bool {
        self.traits.iter().any(|name| name == super::PRIVATE_TRAIT)
    }
}

impl ToRamlMap for Method {
    fn to_raml_map(&self, version: RamlVersion) -> RamlMap {
        let mut inner = RamlMap::new();
        if let Some(description) = &self.description {
            inner.insert("description".to_owned(), RamlValue::from(description.clone()));
        }
        if let Some((key, value)) = keyed_maps("queryParameters", &self.query_parameters, version) {
            inner.insert(key, value);
        }
        if !self.traits.is_empty() {
            inner.insert(
                "is".to_owned(),
                RamlValue::Sequence(self.traits.iter().cloned().map(RamlValue::from).collect()),
            );
        }
        if !self.secured_by.is_empty() {
            inner.insert(
                "securedBy".to_owned(),
                RamlValue::Sequence(
                    self.secured_by.iter().cloned().map(RamlValue::from).collect(),
                ),
            );
        }
        if let Some((key, value)) = keyed_maps("body", &self.request_bodies, version) {
            inner.insert(key, value);
        }
        if let Some((key, value)) = keyed_maps("responses", &self.responses, version) {
            inner.insert(key, value);
        }
        raml_map! { self.method.clone() => inner }
    }
}
