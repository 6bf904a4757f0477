//! Grouping and merging of raw fragments.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::api::RamlVersion;
use crate::error::AggregationError;
use crate::schema::JsonSchemaMerger;
use crate::tree::{Include, RamlMap, RamlValue, TreeExt, raml_map};

use super::RamlFragment;

/// Fragments sharing a first path segment, prefix-stripped and merged,
/// sorted by remaining-path length so parent resources precede nested ones.
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentGroup {
    common_path_prefix: String,
    fragments: Vec<RamlFragment>,
}

impl FragmentGroup {
    /// The shared leading `/segment` of the group.
    pub fn common_path_prefix(&self) -> &str {
        &self.common_path_prefix
    }

    /// The merged member fragments, parents first.
    pub fn fragments(&self) -> &[RamlFragment] {
        &self.fragments
    }
}

/// The merging engine: partitions fragments into groups and resolves
/// path+method collisions.
///
/// The dialect decides which keyword carries schema references (`type` for
/// 1.0, `schema` for 0.8) and whether colliding examples are aggregated
/// into a keyed `examples` mapping or reduced to the first one.
#[derive(Debug)]
pub struct FragmentProcessor {
    version: RamlVersion,
    schema_merger: JsonSchemaMerger,
}

impl FragmentProcessor {
    /// Creates a processor for the given dialect.
    pub fn new(version: RamlVersion, schema_merger: JsonSchemaMerger) -> Self {
        Self {
            version,
            schema_merger,
        }
    }

    /// The dialect this processor emits.
    pub fn version(&self) -> RamlVersion {
        self.version
    }

    /// Partitions fragments by first path segment, strips the shared prefix
    /// and merges fragments with an identical remaining path.
    ///
    /// Groups come out ordered by prefix string for stable file emission.
    pub fn group_fragments(
        &self,
        fragments: &[RamlFragment],
    ) -> Result<Vec<FragmentGroup>, AggregationError> {
        let mut by_prefix: BTreeMap<String, Vec<RamlFragment>> = BTreeMap::new();
        for fragment in fragments {
            let prefix = fragment.first_path_part();
            let stripped = RamlFragment {
                path: fragment.path.replacen(prefix.as_str(), "", 1),
                ..fragment.clone()
            };
            by_prefix.entry(prefix).or_default().push(stripped);
        }
        let mut groups = Vec::with_capacity(by_prefix.len());
        for (common_path_prefix, members) in by_prefix {
            let mut merged = self.merge_fragments_with_same_path(members)?;
            merged.sort_by_key(|fragment| fragment.path.len());
            debug!(
                prefix = %common_path_prefix,
                fragments = merged.len(),
                "grouped fragments"
            );
            groups.push(FragmentGroup {
                common_path_prefix,
                fragments: merged,
            });
        }
        Ok(groups)
    }

    /// The root document tree: title, optional base URI, and one `!include`
    /// entry per group pointing at its generated file.
    pub fn aggregate_file_map(
        title: &str,
        base_uri: Option<&str>,
        output_prefix: &str,
        groups: &[FragmentGroup],
        suffix: &str,
    ) -> RamlMap {
        let mut map = raml_map! { "title" => title };
        if let Some(base_uri) = base_uri {
            map.insert("baseUri".to_owned(), RamlValue::from(base_uri));
        }
        for group in groups {
            let file_name = Self::group_file_name(&group.common_path_prefix, suffix, output_prefix);
            map.insert(
                group.common_path_prefix.clone(),
                RamlValue::Include(Include::new(file_name)),
            );
        }
        map
    }

    /// The document tree of one group: fragments with a non-empty path nest
    /// under it, the empty-path fragment's entries splice in at top level.
    pub fn group_file_map(group: &FragmentGroup) -> RamlMap {
        let mut map = RamlMap::new();
        for fragment in &group.fragments {
            if fragment.path.is_empty() {
                map.extend(fragment.content.clone());
            } else {
                map.insert(
                    fragment.path.clone(),
                    RamlValue::Mapping(fragment.content.clone()),
                );
            }
        }
        map
    }

    /// The output file name for a group's path prefix.
    ///
    /// `/` becomes `root`; otherwise the leading `/` is stripped, braces
    /// around path parameters are dropped and remaining `/` become `-`. A
    /// name colliding with the root document's prefix gets a `-group`
    /// marker.
    pub fn group_file_name(path: &str, suffix: &str, output_prefix: &str) -> String {
        let base = if path == "/" {
            "root".to_owned()
        } else {
            path.strip_prefix('/')
                .unwrap_or(path)
                .replace(['{', '}'], "")
                .replace('/', "-")
        };
        if base == output_prefix {
            format!("{base}-group{suffix}")
        } else {
            format!("{base}{suffix}")
        }
    }

    fn merge_fragments_with_same_path(
        &self,
        fragments: Vec<RamlFragment>,
    ) -> Result<Vec<RamlFragment>, AggregationError> {
        let mut by_path: IndexMap<String, Vec<RamlFragment>> = IndexMap::new();
        for fragment in fragments {
            by_path
                .entry(fragment.path.clone())
                .or_default()
                .push(fragment);
        }
        let mut merged = Vec::with_capacity(by_path.len());
        for (path, mut group) in by_path {
            if group.len() > 1 {
                merged.push(self.merge_same_path(&path, &group)?);
            } else if let Some(single) = group.pop() {
                merged.push(single);
            }
        }
        Ok(merged)
    }

    /// Merges all fragments sharing one post-strip path into one
    /// multi-method fragment. The merged fragment carries the shortest
    /// member id (stable on ties).
    fn merge_same_path(
        &self,
        path: &str,
        fragments: &[RamlFragment],
    ) -> Result<RamlFragment, AggregationError> {
        let mut by_method: IndexMap<String, Vec<&RamlFragment>> = IndexMap::new();
        for fragment in fragments {
            by_method
                .entry(fragment.request_method()?.to_owned())
                .or_default()
                .push(fragment);
        }
        let mut content = RamlMap::new();
        if let Some(parameters) = fragments
            .iter()
            .find_map(|fragment| fragment.content.get("uriParameters"))
        {
            content.insert("uriParameters".to_owned(), parameters.clone());
        }
        for (method, group) in by_method {
            let method_content = match group.as_slice() {
                [single] => single.content.get(&method).cloned().unwrap_or(RamlValue::Null),
                colliding => self.merge_colliding(&method, colliding)?,
            };
            content.insert(method, method_content);
        }
        let id = fragments
            .iter()
            .map(|fragment| fragment.id.as_str())
            .min_by_key(|id| id.len())
            .unwrap_or_default()
            .to_owned();
        Ok(RamlFragment::new(id, path, content))
    }

    /// Merges fragments colliding on path and method.
    ///
    /// The fragment with the shortest id seeds the non-body fields; the
    /// request body and each response status are then rebuilt by unioning
    /// the colliding bodies per content type and merging schema references
    /// and examples within each content type. The two aggregations are
    /// independent.
    fn merge_colliding(
        &self,
        method: &str,
        fragments: &[&RamlFragment],
    ) -> Result<RamlValue, AggregationError> {
        let seed = fragments
            .iter()
            .min_by_key(|fragment| fragment.id.len())
            .ok_or_else(|| AggregationError::MalformedDocument {
                message: "cannot merge an empty fragment set".to_owned(),
            })?;
        let mut target = seed
            .content
            .get(method)
            .and_then(RamlValue::as_mapping)
            .cloned()
            .ok_or_else(|| AggregationError::InvalidFragment {
                id: seed.id.clone(),
                message: format!("colliding method '{method}' must hold a mapping"),
            })?;
        // request bodies, unioned and merged per content type
        let request_bodies: Vec<(&str, &RamlMap)> = fragments
            .iter()
            .filter_map(|fragment| {
                let body = method_map(fragment, method)?.get("body")?.as_mapping()?;
                Some((fragment.id.as_str(), body))
            })
            .collect();
        if !request_bodies.is_empty() {
            target.insert(
                "body".to_owned(),
                RamlValue::Mapping(self.merge_bodies(&request_bodies)?),
            );
        }

        // responses, statuses unioned first-seen
        let mut statuses = RamlMap::new();
        for fragment in fragments {
            if let Some(RamlValue::Mapping(fragment_responses)) =
                method_map(fragment, method).and_then(|map| map.get("responses"))
            {
                for (status, response) in fragment_responses {
                    if !statuses.contains_key(status) {
                        statuses.insert(status.clone(), response.clone());
                    }
                }
            }
        }
        if !statuses.is_empty() {
            let mut merged_responses = RamlMap::with_capacity(statuses.len());
            for (status, response) in statuses {
                let RamlValue::Mapping(mut response_map) = response else {
                    merged_responses.insert(status, response);
                    continue;
                };
                let status_bodies: Vec<(&str, &RamlMap)> = fragments
                    .iter()
                    .filter_map(|fragment| {
                        let body = status_map(fragment, method, &status)?
                            .get("body")?
                            .as_mapping()?;
                        Some((fragment.id.as_str(), body))
                    })
                    .collect();
                if !status_bodies.is_empty() {
                    response_map.insert(
                        "body".to_owned(),
                        RamlValue::Mapping(self.merge_bodies(&status_bodies)?),
                    );
                }
                merged_responses.insert(status, RamlValue::Mapping(response_map));
            }
            target.insert("responses".to_owned(), RamlValue::Mapping(merged_responses));
        }

        Ok(RamlValue::Mapping(target))
    }

    /// Unions colliding body mappings per content type, in input order.
    ///
    /// Within one content type, schema references at the dialect's keyword
    /// are merged through the schema merger and examples are aggregated,
    /// keyed by the originating fragment's id. Different content types never
    /// interact, and the merge never leaves the body subtree, so sibling
    /// entries such as `queryParameters` stay untouched.
    fn merge_bodies(
        &self,
        bodies: &[(&str, &RamlMap)],
    ) -> Result<RamlMap, AggregationError> {
        let mut unioned = RamlMap::new();
        for (_, body) in bodies {
            for (content_type, content) in *body {
                if !unioned.contains_key(content_type) {
                    unioned.insert(content_type.clone(), content.clone());
                }
            }
        }
        let keyword = self.version.schema_keyword();
        let mut merged = RamlMap::with_capacity(unioned.len());
        for (content_type, content) in unioned {
            let RamlValue::Mapping(mut content_map) = content else {
                merged.insert(content_type, content);
                continue;
            };
            let schemas: Vec<Include> = bodies
                .iter()
                .filter_map(|(_, body)| {
                    body.get(&content_type)?.get(keyword)?.as_include().cloned()
                })
                .collect();
            if schemas.len() > 1 {
                if let Some(merged_schema) = self.schema_merger.merge_schemas(&schemas)? {
                    content_map.insert(keyword.to_owned(), RamlValue::Include(merged_schema));
                }
            }
            let examples: Vec<(String, Include)> = bodies
                .iter()
                .filter_map(|(id, body)| {
                    let include = body
                        .get(&content_type)?
                        .get("example")?
                        .as_include()?
                        .clone();
                    Some(((*id).to_owned(), include))
                })
                .collect();
            content_map = self.aggregate_examples(content_map, &examples);
            merged.insert(content_type, RamlValue::Mapping(content_map));
        }
        Ok(merged)
    }

    /// Replaces the single `example` entry with an `examples` mapping keyed
    /// by fragment id when the dialect supports it; otherwise keeps the
    /// first example and logs how many were dropped.
    fn aggregate_examples(&self, map: RamlMap, examples: &[(String, Include)]) -> RamlMap {
        if examples.is_empty() {
            return map;
        }
        if self.version.supports_multiple_examples() {
            let keyed: RamlMap = examples
                .iter()
                .map(|(id, include)| (id.clone(), RamlValue::Include(include.clone())))
                .collect();
            map.replace("example", "examples", &|_| RamlValue::Mapping(keyed.clone()), &[])
        } else {
            if examples.len() > 1 {
                warn!(
                    dropped = examples.len() - 1,
                    "dialect supports a single example per body, keeping the first"
                );
            }
            map
        }
    }
}

fn method_map<'a>(fragment: &'a RamlFragment, method: &str) -> Option<&'a RamlMap> {
    fragment.content.get(method).and_then(RamlValue::as_mapping)
}

fn status_map<'a>(fragment: &'a RamlFragment, method: &str, status: &str) -> Option<&'a RamlMap> {
    method_map(fragment, method)?
        .get("responses")?
        .get(status)?
        .as_mapping()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yaml;
    use rstest::rstest;
    use tempfile::TempDir;

    const SCHEMA_CREATE: &str = r#"{
  "type": "object",
  "properties": {
    "name": { "description": "The name of the shipping method.", "type": "string" },
    "fixedPrice": { "description": "The fixed price.", "type": "object" }
  }
}"#;

    const SCHEMA_CREATE_WEIGHT_BASED: &str = r#"{
  "type": "object",
  "properties": {
    "name": { "description": "The name of the shipping method.", "type": "string" },
    "weightBasedPrice": { "description": "The weight based price.", "type": "object" }
  }
}"#;

    fn processor(version: RamlVersion) -> (TempDir, FragmentProcessor) {
        let dir = tempfile::tempdir().expect("a temp dir");
        let merger = JsonSchemaMerger::new(dir.path());
        (dir, FragmentProcessor::new(version, merger))
    }

    fn fragment(id: &str, text: &str) -> RamlFragment {
        let doc = yaml::parse_fragment(text).expect("a parsed fragment");
        RamlFragment::from_yaml(id, &doc).expect("a fragment")
    }

    fn plain_fragments() -> Vec<RamlFragment> {
        vec![
            RamlFragment::new("carts-list", "/carts", raml_map! { "get" => "some" }),
            RamlFragment::new("cart-get", "/carts/{id}", raml_map! { "get" => "some" }),
            RamlFragment::new("cart-post", "/carts/{id}", raml_map! { "post" => "some" }),
            RamlFragment::new("product-get", "/products/{id}", raml_map! { "get" => "some" }),
        ]
    }

    fn colliding_fragments() -> Vec<RamlFragment> {
        vec![
            fragment(
                "shipping-zones-shipping-methods-create",
                r"/shipping-zones/{shippingZoneId}/shipping-methods:
  post:
    description:
    body:
      application/json:
        type: !include shipping-zones-shipping-methods-create-schema-request.json
        example: !include shipping-zones-shipping-methods-create-request.json
    responses:
      201:
        body:
          application/hal+json:
            example: !include shipping-zones-shipping-methods-create-response.json
",
            ),
            fragment(
                "shipping-zones-shipping-methods-create-with-weight-based-price",
                r"/shipping-zones/{shippingZoneId}/shipping-methods:
  post:
    description:
    body:
      application/json:
        type: !include shipping-zones-shipping-methods-create-with-weight-based-price-schema-request.json
        example: !include shipping-zones-shipping-methods-create-with-weight-based-price-request.json
    responses:
      201:
        body:
          application/hal+json:
            example: !include shipping-zones-shipping-methods-create-with-weight-based-price-response.json
",
            ),
        ]
    }

    fn write_colliding_schemas(dir: &TempDir) {
        std::fs::write(
            dir.path()
                .join("shipping-zones-shipping-methods-create-schema-request.json"),
            SCHEMA_CREATE,
        )
        .expect("a written schema");
        std::fs::write(
            dir.path().join(
                "shipping-zones-shipping-methods-create-with-weight-based-price-schema-request.json",
            ),
            SCHEMA_CREATE_WEIGHT_BASED,
        )
        .expect("a written schema");
    }

    #[test]
    fn should_group_fragments_by_first_path_part() {
        let (_dir, processor) = processor(RamlVersion::V1_0);

        let groups = processor
            .group_fragments(&plain_fragments())
            .expect("grouped fragments");

        let prefixes: Vec<&str> = groups
            .iter()
            .map(FragmentGroup::common_path_prefix)
            .collect();
        assert_eq!(prefixes, vec!["/carts", "/products"]);

        let carts = &groups[0];
        let paths: Vec<&str> = carts
            .fragments()
            .iter()
            .map(|fragment| fragment.path.as_str())
            .collect();
        assert_eq!(paths, vec!["", "/{id}"]);
        // different methods on the same path fold into one fragment,
        // carrying the shortest member id
        assert_eq!(
            carts.fragments()[1],
            RamlFragment::new(
                "cart-get",
                "/{id}",
                raml_map! { "get" => "some", "post" => "some" },
            )
        );
        assert_eq!(
            carts.fragments()[0],
            RamlFragment::new("carts-list", "", raml_map! { "get" => "some" })
        );
    }

    #[test]
    fn should_merge_colliding_fragments_with_aggregated_examples() {
        let (dir, processor) = processor(RamlVersion::V1_0);
        write_colliding_schemas(&dir);

        let groups = processor
            .group_fragments(&colliding_fragments())
            .expect("grouped fragments");

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].fragments().len(), 1);
        let merged = &groups[0].fragments()[0];
        assert_eq!(merged.path, "/{shippingZoneId}/shipping-methods");
        assert_eq!(merged.request_method().ok(), Some("post"));

        let body = merged
            .content
            .find_first_excluding("body", &["responses"])
            .and_then(RamlValue::as_mapping)
            .expect("a request body");
        assert_eq!(
            body.find_first("examples"),
            Some(&RamlValue::Mapping(raml_map! {
                "shipping-zones-shipping-methods-create" =>
                    Include::new("shipping-zones-shipping-methods-create-request.json"),
                "shipping-zones-shipping-methods-create-with-weight-based-price" =>
                    Include::new("shipping-zones-shipping-methods-create-with-weight-based-price-request.json"),
            })),
        );
        assert_eq!(body.find_first("example"), None);
        assert_eq!(
            body.find_first("type"),
            Some(&RamlValue::Include(Include::new(
                "shipping-zones-shipping-methods-create-schema-request-merged.json"
            ))),
        );
        assert!(
            dir.path()
                .join("shipping-zones-shipping-methods-create-schema-request-merged.json")
                .is_file()
        );

        let responses = merged
            .content
            .find_first("responses")
            .and_then(RamlValue::as_mapping)
            .expect("responses");
        assert_eq!(
            responses.find_first("examples"),
            Some(&RamlValue::Mapping(raml_map! {
                "shipping-zones-shipping-methods-create" =>
                    Include::new("shipping-zones-shipping-methods-create-response.json"),
                "shipping-zones-shipping-methods-create-with-weight-based-price" =>
                    Include::new("shipping-zones-shipping-methods-create-with-weight-based-price-response.json"),
            })),
        );
    }

    #[test]
    fn should_keep_first_example_without_multi_example_support() {
        let (_dir, processor) = processor(RamlVersion::V0_8);
        let fragments = vec![
            fragment(
                "cart-create",
                r"/carts:
  post:
    description:
    body:
      application/json:
        example: !include cart-create-request.json
",
            ),
            fragment(
                "cart-create-empty",
                r"/carts:
  post:
    description:
    body:
      application/json:
        example: !include cart-create-empty-request.json
",
            ),
        ];

        let groups = processor
            .group_fragments(&fragments)
            .expect("grouped fragments");

        let merged = &groups[0].fragments()[0];
        let body = merged
            .content
            .find_first("body")
            .and_then(RamlValue::as_mapping)
            .expect("a request body");
        assert_eq!(body.find_first("examples"), None);
        assert_eq!(
            body.find_first("example"),
            Some(&RamlValue::Include(Include::new(
                "cart-create-request.json"
            ))),
        );
    }

    #[test]
    fn should_leave_query_parameter_types_untouched_when_merging_schemas() {
        let (dir, processor) = processor(RamlVersion::V1_0);
        std::fs::write(dir.path().join("s1.json"), r#"{ "required": ["a"] }"#)
            .expect("a written schema");
        std::fs::write(dir.path().join("s2.json"), r#"{ "required": ["b"] }"#)
            .expect("a written schema");
        let fragments = vec![
            fragment(
                "carts-search",
                r"/carts:
  post:
    description:
    queryParameters:
      locale:
        description: The locale
        type: string
    body:
      application/json:
        type: !include s1.json
",
            ),
            fragment(
                "carts-search-filtered",
                r"/carts:
  post:
    description:
    queryParameters:
      locale:
        description: The locale
        type: string
    body:
      application/json:
        type: !include s2.json
",
            ),
        ];

        let groups = processor
            .group_fragments(&fragments)
            .expect("grouped fragments");

        let merged = &groups[0].fragments()[0];
        let post = merged
            .content
            .get("post")
            .and_then(RamlValue::as_mapping)
            .expect("the merged method");
        // the parameter type is a plain string, not a schema reference
        assert_eq!(
            post.get("queryParameters")
                .and_then(|parameters| parameters.get("locale"))
                .and_then(|locale| locale.get("type"))
                .and_then(RamlValue::as_str),
            Some("string")
        );
        assert_eq!(
            post.get("body")
                .and_then(|body| body.get("application/json"))
                .and_then(|content| content.get("type")),
            Some(&RamlValue::Include(Include::new("s1-merged.json")))
        );
        assert!(dir.path().join("s1-merged.json").is_file());
    }

    #[test]
    fn should_union_content_types_across_colliding_fragments() {
        let (_dir, processor) = processor(RamlVersion::V1_0);
        let fragments = vec![
            fragment(
                "cart-create",
                r"/carts:
  post:
    description:
    body:
      application/json:
        type: !include cart-create-schema-request.json
    responses:
      201:
        body:
          application/hal+json:
            example: !include cart-create-response.json
",
            ),
            fragment(
                "cart-create-uri-list",
                r"/carts:
  post:
    description:
    body:
      text/uri-list:
        example: !include cart-create-uri-list-request.json
    responses:
      201:
        body:
          text/uri-list:
            example: !include cart-create-uri-list-response.json
",
            ),
        ];

        let groups = processor
            .group_fragments(&fragments)
            .expect("grouped fragments");

        let merged = &groups[0].fragments()[0];
        let body = merged
            .content
            .get("post")
            .and_then(|post| post.get("body"))
            .and_then(RamlValue::as_mapping)
            .expect("the merged request body");
        assert!(body.contains_key("application/json"));
        assert!(body.contains_key("text/uri-list"));
        // a content type referenced by a single fragment keeps its schema
        assert_eq!(
            body.get("application/json").and_then(|content| content.get("type")),
            Some(&RamlValue::Include(Include::new(
                "cart-create-schema-request.json"
            )))
        );

        let response_body = merged
            .content
            .get("post")
            .and_then(|post| post.get("responses"))
            .and_then(|responses| responses.get("201"))
            .and_then(|response| response.get("body"))
            .and_then(RamlValue::as_mapping)
            .expect("the merged response body");
        assert!(response_body.contains_key("application/hal+json"));
        assert!(response_body.contains_key("text/uri-list"));
    }

    #[test]
    fn should_not_collide_fragments_with_different_methods() {
        let (_dir, processor) = processor(RamlVersion::V1_0);
        let fragments = vec![
            fragment(
                "cart-delete-line-item",
                r"/{cartId}/line-items/{lineItemId}:
  delete:
    description:
    responses:
      200:
        body:
          application/hal+json:
            example: !include cart-delete-line-item-response.json
",
            ),
            fragment(
                "cart-line-item-update",
                r"/{cartId}/line-items/{lineItemId}:
  put:
    description:
    body:
      text/uri-list:
        example: !include cart-line-item-update-request.json
",
            ),
        ];

        let groups = processor
            .group_fragments(&fragments)
            .expect("grouped fragments");

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].fragments().len(), 1);
        let merged = &groups[0].fragments()[0];
        assert_eq!(merged.path, "/line-items/{lineItemId}");
        assert!(merged.content.contains_key("delete"));
        assert!(merged.content.contains_key("put"));
        // non-colliding methods pass through without example aggregation
        assert_eq!(merged.content.find_first("examples"), None);
    }

    #[test]
    fn should_be_idempotent_for_already_merged_fragments() {
        let (dir, processor) = processor(RamlVersion::V1_0);
        write_colliding_schemas(&dir);
        let groups = processor
            .group_fragments(&colliding_fragments())
            .expect("grouped fragments");
        let merged = groups[0].fragments()[0].clone();
        let remerged_input = RamlFragment::new(
            merged.id.clone(),
            format!("/shipping-zones{}", merged.path),
            merged.content.clone(),
        );

        let regrouped = processor
            .group_fragments(std::slice::from_ref(&remerged_input))
            .expect("regrouped fragments");

        assert_eq!(regrouped[0].fragments()[0].content, merged.content);
    }

    #[test]
    fn should_create_aggregate_file_map() {
        let (_dir, processor) = processor(RamlVersion::V1_0);
        let groups = processor
            .group_fragments(&plain_fragments())
            .expect("grouped fragments");

        let map = FragmentProcessor::aggregate_file_map(
            "title",
            Some("http://example.com"),
            "api",
            &groups,
            ".raml",
        );

        assert_eq!(
            map,
            raml_map! {
                "title" => "title",
                "baseUri" => "http://example.com",
                "/carts" => Include::new("carts.raml"),
                "/products" => Include::new("products.raml"),
            }
        );
    }

    #[test]
    fn should_create_group_file_map() {
        let (_dir, processor) = processor(RamlVersion::V1_0);
        let groups = processor
            .group_fragments(&plain_fragments())
            .expect("grouped fragments");

        let map = FragmentProcessor::group_file_map(&groups[0]);

        assert_eq!(
            map,
            raml_map! {
                "get" => "some",
                "/{id}" => raml_map! { "get" => "some", "post" => "some" },
            }
        );
    }

    #[rstest]
    #[case("/", ".raml", "api", "root.raml")]
    #[case("/api", ".raml", "api", "api-group.raml")]
    #[case("/carts", ".raml", "api", "carts.raml")]
    #[case("/carts/{id}", ".raml", "api", "carts-id.raml")]
    #[case("/payment-methods", "-public.raml", "api", "payment-methods-public.raml")]
    fn should_compute_group_file_names(
        #[case] path: &str,
        #[case] suffix: &str,
        #[case] prefix: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(FragmentProcessor::group_file_name(path, suffix, prefix), expected);
    }
}
