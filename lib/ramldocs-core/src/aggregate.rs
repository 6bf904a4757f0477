//! The end-to-end aggregation run over a snippets directory tree.

use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::api::RamlVersion;
use crate::error::AggregationError;
use crate::fragment::{FragmentProcessor, RamlFragment};
use crate::schema::JsonSchemaMerger;
use crate::yaml;

/// The configuration surface of one aggregation run.
#[derive(Debug, Clone)]
pub struct AggregationConfig {
    /// Title of the aggregated API.
    pub api_title: String,
    /// Optional base URI emitted into the root document.
    pub api_base_uri: Option<String>,
    /// The dialect to emit.
    pub raml_version: RamlVersion,
    /// Whether to additionally emit a variant with private endpoints
    /// filtered out.
    pub separate_public_api: bool,
    /// The directory tree holding the generated snippets.
    pub snippets_directory: PathBuf,
    /// Where output documents, copied example bodies and merged schemas go.
    pub output_directory: PathBuf,
    /// Base name of the root document; group files colliding with it get a
    /// `-group` marker.
    pub output_file_name_prefix: String,
}

/// Runs the whole pipeline: discovery, parsing, grouping, merging and
/// document emission.
///
/// The run is synchronous and fail-fast; any error leaves partially written
/// output behind and aborts.
#[derive(Debug)]
pub struct Aggregator {
    config: AggregationConfig,
}

impl Aggregator {
    /// Creates an aggregator for the given configuration.
    pub fn new(config: AggregationConfig) -> Self {
        Self { config }
    }

    /// Aggregates all fragments under the snippets directory into the
    /// output directory.
    ///
    /// Emits the root document plus one file per resource group with the
    /// `.raml` suffix, and repeats with private fragments filtered out and
    /// the `-public.raml` suffix when configured.
    pub fn aggregate(&self) -> Result<(), AggregationError> {
        fs::create_dir_all(&self.config.output_directory)
            .map_err(|source| AggregationError::io(&self.config.output_directory, source))?;

        self.copy_example_bodies()?;

        let fragments = self.collect_fragments()?;
        info!(fragments = fragments.len(), "aggregating fragments");

        self.write_documents(&fragments, ".raml")?;
        if self.config.separate_public_api {
            let public: Vec<RamlFragment> = fragments
                .iter()
                .filter(|fragment| !fragment.is_private())
                .cloned()
                .collect();
            self.write_documents(&public, "-public.raml")?;
        }
        Ok(())
    }

    /// Copies `*-request.json` / `*-response.json` example bodies next to
    /// the documents that reference them.
    fn copy_example_bodies(&self) -> Result<(), AggregationError> {
        for entry in WalkDir::new(&self.config.snippets_directory) {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy();
            if name.ends_with("-request.json") || name.ends_with("-response.json") {
                let target = self.config.output_directory.join(name.as_ref());
                fs::copy(entry.path(), &target)
                    .map_err(|source| AggregationError::io(&target, source))?;
            }
        }
        Ok(())
    }

    /// Discovers and parses every fragment file in the snippets tree.
    ///
    /// Fragments come back sorted by id so the run is deterministic
    /// regardless of directory enumeration order. The schema-to-type rename
    /// is applied here when emitting the 1.0 dialect, before any grouping.
    fn collect_fragments(&self) -> Result<Vec<RamlFragment>, AggregationError> {
        let mut fragments = Vec::new();
        for entry in WalkDir::new(&self.config.snippets_directory) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            if !entry
                .file_name()
                .to_string_lossy()
                .starts_with("raml-resource")
            {
                continue;
            }
            let fragment = RamlFragment::from_file(entry.path())?;
            debug!(id = %fragment.id, path = %fragment.path, "parsed fragment");
            fragments.push(match self.config.raml_version {
                RamlVersion::V1_0 => fragment.replace_schema_with_type(),
                RamlVersion::V0_8 => fragment,
            });
        }
        fragments.sort_by(|left, right| left.id.cmp(&right.id));
        Ok(fragments)
    }

    fn write_documents(
        &self,
        fragments: &[RamlFragment],
        suffix: &str,
    ) -> Result<(), AggregationError> {
        let merger = JsonSchemaMerger::new(&self.config.output_directory);
        let processor = FragmentProcessor::new(self.config.raml_version, merger);
        let groups = processor.group_fragments(fragments)?;
        let header = self.config.raml_version.header();

        let root = FragmentProcessor::aggregate_file_map(
            &self.config.api_title,
            self.config.api_base_uri.as_deref(),
            &self.config.output_file_name_prefix,
            &groups,
            suffix,
        );
        let root_path = self
            .config
            .output_directory
            .join(format!("{}{suffix}", self.config.output_file_name_prefix));
        yaml::write_file(&root_path, &root, Some(header))?;

        for group in &groups {
            let file_name = FragmentProcessor::group_file_name(
                group.common_path_prefix(),
                suffix,
                &self.config.output_file_name_prefix,
            );
            yaml::write_file(
                &self.config.output_directory.join(file_name),
                &FragmentProcessor::group_file_map(group),
                Some(header),
            )?;
        }
        info!(groups = groups.len(), suffix, "wrote aggregated documents");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{RamlValue, TreeExt};
    use tempfile::TempDir;

    fn write_snippet(snippets: &std::path::Path, id: &str, fragment: &str) {
        let dir = snippets.join(id);
        std::fs::create_dir_all(&dir).expect("a snippet dir");
        std::fs::write(dir.join("raml-resource.raml"), fragment).expect("a written fragment");
    }

    fn config(snippets: &TempDir, output: &TempDir) -> AggregationConfig {
        AggregationConfig {
            api_title: "Carts API".to_owned(),
            api_base_uri: Some("http://example.com".to_owned()),
            raml_version: "1.0".parse().expect("a version"),
            separate_public_api: true,
            snippets_directory: snippets.path().to_path_buf(),
            output_directory: output.path().to_path_buf(),
            output_file_name_prefix: "api".to_owned(),
        }
    }

    #[test]
    fn should_aggregate_snippets_into_documents() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let snippets = tempfile::tempdir().expect("a snippets dir");
        let output = tempfile::tempdir().expect("an output dir");
        write_snippet(
            snippets.path(),
            "carts-list",
            r"/carts:
  get:
    description: List carts
    responses:
      200:
        body:
          application/hal+json:
            schema: !include carts-list-schema-response.json
            example: !include carts-list-response.json
",
        );
        write_snippet(
            snippets.path(),
            "cart-delete",
            r"/carts/{id}:
  delete:
    description: Delete a cart
    is: ['private']
",
        );
        std::fs::write(
            snippets.path().join("carts-list").join("carts-list-response.json"),
            "{}",
        )
        .expect("a written body");

        Aggregator::new(config(&snippets, &output))
            .aggregate()
            .expect("an aggregation run");

        // example bodies are copied next to the documents
        assert!(output.path().join("carts-list-response.json").is_file());

        let root = std::fs::read_to_string(output.path().join("api.raml")).expect("the root file");
        assert!(root.starts_with("#%RAML 1.0\n"));
        let root_tree = crate::yaml::parse_fragment(&root).expect("a parsed root");
        assert_eq!(
            root_tree.get("title").and_then(RamlValue::as_str),
            Some("Carts API")
        );
        assert_eq!(
            root_tree.get("/carts"),
            Some(&RamlValue::Include(crate::tree::Include::new("carts.raml")))
        );

        let carts =
            std::fs::read_to_string(output.path().join("carts.raml")).expect("the group file");
        assert!(carts.starts_with("#%RAML 1.0\n"));
        let carts_tree = crate::yaml::parse_fragment(&carts).expect("a parsed group");
        assert!(carts_tree.contains_key("get"));
        assert!(carts_tree.get("/{id}").and_then(|resource| resource.get("delete")).is_some());
        // the 1.0 dialect renames schema to type
        assert!(carts_tree.find_first("type").is_some());
        assert_eq!(carts_tree.find_first("schema"), None);

        // the public variant drops the private endpoint
        let public = std::fs::read_to_string(output.path().join("carts-public.raml"))
            .expect("the public group file");
        let public_tree = crate::yaml::parse_fragment(&public).expect("a parsed public group");
        assert!(public_tree.contains_key("get"));
        assert_eq!(public_tree.find_first("delete"), None);
        assert!(output.path().join("api-public.raml").is_file());
    }

    #[test]
    fn should_omit_public_variant_when_not_configured() {
        let snippets = tempfile::tempdir().expect("a snippets dir");
        let output = tempfile::tempdir().expect("an output dir");
        write_snippet(
            snippets.path(),
            "carts-list",
            "/carts:\n  get:\n    description: List carts\n",
        );
        let config = AggregationConfig {
            separate_public_api: false,
            ..config(&snippets, &output)
        };

        Aggregator::new(config).aggregate().expect("an aggregation run");

        assert!(output.path().join("api.raml").is_file());
        assert!(!output.path().join("api-public.raml").exists());
    }
}
