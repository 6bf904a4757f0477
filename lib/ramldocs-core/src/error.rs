use std::path::Path;

/// Errors that can occur while aggregating RAML fragments.
///
/// Aggregation is fail-fast: every variant aborts the run. There is no retry
/// logic because a partial or inconsistent API document is worse than a hard
/// stop.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum AggregationError {
    /// Filesystem error while reading fragments or writing output documents.
    #[display("I/O error on '{path}': {source}")]
    #[from(skip)]
    Io {
        /// The file or directory the operation targeted.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Error while walking the snippets directory tree.
    Walk(walkdir::Error),

    /// YAML parse or serialization error without file context.
    ///
    /// Occurs when working with in-memory document text.
    Yaml(serde_yaml::Error),

    /// JSON serialization error while writing a merged schema.
    Json(serde_json::Error),

    /// A fragment file could not be parsed as a RAML document.
    #[display("Failed to parse document '{path}': {message}")]
    #[from(skip)]
    DocumentParse {
        /// Path of the offending file.
        path: String,
        /// Description of the parse failure.
        message: String,
    },

    /// A document tree violates the shape the aggregation expects.
    #[display("Malformed document: {message}")]
    #[from(skip)]
    MalformedDocument {
        /// Description of the violated shape.
        message: String,
    },

    /// A fragment violates the one-path, one-method contract.
    #[display("Invalid fragment '{id}': {message}")]
    #[from(skip)]
    InvalidFragment {
        /// The fragment's stable identifier.
        id: String,
        /// Description of the violation.
        message: String,
    },

    /// Fragments merged into one resource disagree on their path.
    #[display("Fragments for a resource must share a common path, expected '{expected}' but found '{actual}'")]
    #[from(skip)]
    InconsistentPath {
        /// Path of the fragment seeding the resource.
        expected: String,
        /// The diverging path.
        actual: String,
    },

    /// A schema reference could not be resolved inside the base directory.
    #[display("Referenced schema file not found: {location}")]
    #[from(skip)]
    SchemaNotFound {
        /// The unresolvable reference's location.
        location: String,
    },

    /// A referenced schema document is not valid JSON.
    #[display("Failed to parse schema '{location}': {source}")]
    #[from(skip)]
    SchemaParse {
        /// The reference's location.
        location: String,
        /// The underlying JSON parse error.
        source: serde_json::Error,
    },

    /// The configured RAML version is not one of the two supported dialects.
    #[display("Unsupported RAML version: {version}")]
    #[from(skip)]
    UnsupportedVersion {
        /// The rejected version literal.
        version: String,
    },
}

impl AggregationError {
    pub(crate) fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregation_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<AggregationError>();
        assert_sync::<AggregationError>();
    }

    #[test]
    fn should_render_schema_not_found() {
        let error = AggregationError::SchemaNotFound {
            location: "cart-schema.json".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Referenced schema file not found: cart-schema.json"
        );
    }
}
