//! Parsed API contract model
//!
//! A contract is a loosely-typed OpenAPI document. Every accessor on
//! [`Contract`] returns an `Option` or an empty iterator when the underlying
//! node is missing or has the wrong shape - absence is a valid input, and
//! rules built on these accessors cannot panic on malformed documents.

mod fetch;
mod normalize;

use serde_json::Value;

use crate::error::{GradeError, Result};

pub use fetch::fetch_contract;
pub use normalize::canonical_json;

/// HTTP methods recognized as operations on a path item
pub const HTTP_METHODS: [&str; 8] = [
    "get", "post", "put", "patch", "delete", "head", "options", "trace",
];

/// A parsed API contract (OpenAPI document)
#[derive(Debug, Clone)]
pub struct Contract {
    root: Value,
}

impl Contract {
    /// Parse a contract from YAML or JSON text
    ///
    /// JSON is a subset of YAML, so a single YAML parse handles both, but a
    /// leading `{` is routed through serde_json first for precise errors.
    pub fn parse(content: &str) -> Result<Self> {
        let trimmed = content.trim_start();
        if trimmed.is_empty() {
            return Err(GradeError::ContractParse {
                reason: "empty document".to_string(),
            });
        }

        let root: Value = if trimmed.starts_with('{') {
            serde_json::from_str(content).map_err(|e| GradeError::ContractParse {
                reason: format!("invalid JSON: {}", e),
            })?
        } else {
            serde_yaml::from_str(content).map_err(|e| GradeError::ContractParse {
                reason: format!("invalid YAML: {}", e),
            })?
        };

        if !root.is_object() {
            return Err(GradeError::ContractParse {
                reason: "top-level node is not an object".to_string(),
            });
        }

        Ok(Contract { root })
    }

    /// Wrap an already-parsed JSON tree
    pub fn from_value(root: Value) -> Self {
        Contract { root }
    }

    /// The underlying JSON tree
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Canonical byte representation used for content-identity hashing
    pub fn canonical_bytes(&self) -> String {
        canonical_json(&self.root)
    }

    /// Declared OpenAPI version, if any
    pub fn openapi_version(&self) -> Option<&str> {
        self.root.get("openapi").and_then(Value::as_str)
    }

    /// `info.title`, if present
    pub fn info_title(&self) -> Option<&str> {
        self.root
            .get("info")
            .and_then(|i| i.get("title"))
            .and_then(Value::as_str)
    }

    /// `info.version`, if present
    pub fn info_version(&self) -> Option<&str> {
        self.root
            .get("info")
            .and_then(|i| i.get("version"))
            .and_then(Value::as_str)
    }

    /// Stable API identity derived from the contract title
    pub fn api_id(&self) -> String {
        match self.info_title() {
            Some(title) if !title.trim().is_empty() => slug::slugify(title),
            _ => "untitled-api".to_string(),
        }
    }

    /// Whether the document has a `paths` object at all
    pub fn has_paths(&self) -> bool {
        self.root.get("paths").is_some_and(Value::is_object)
    }

    /// Iterate path entries; non-object path items are skipped
    pub fn paths(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.root
            .get("paths")
            .and_then(Value::as_object)
            .into_iter()
            .flat_map(|m| m.iter())
            .filter(|(_, item)| item.is_object())
            .map(|(path, item)| (path.as_str(), item))
    }

    /// Iterate every operation (path x method) in the document
    pub fn operations(&self) -> Vec<Operation<'_>> {
        let mut ops = Vec::new();
        for (path, item) in self.paths() {
            for method in HTTP_METHODS {
                if let Some(node) = item.get(method).filter(|n| n.is_object()) {
                    ops.push(Operation {
                        path,
                        method,
                        node,
                        path_item: item,
                    });
                }
            }
        }
        ops
    }

    /// `components.schemas` entries, empty when absent
    pub fn schemas(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.root
            .get("components")
            .and_then(|c| c.get("schemas"))
            .and_then(Value::as_object)
            .into_iter()
            .flat_map(|m| m.iter())
            .map(|(name, schema)| (name.as_str(), schema))
    }

    /// Top-level `webhooks` entries (OpenAPI 3.1), empty when absent
    pub fn webhooks(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.root
            .get("webhooks")
            .and_then(Value::as_object)
            .into_iter()
            .flat_map(|m| m.iter())
            .map(|(name, item)| (name.as_str(), item))
    }

    /// Top-level vendor extension keys (`x-...`)
    pub fn vendor_extensions(&self) -> Vec<&str> {
        self.root
            .as_object()
            .map(|m| {
                m.keys()
                    .filter(|k| k.starts_with("x-"))
                    .map(String::as_str)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// One operation within a contract
#[derive(Debug, Clone, Copy)]
pub struct Operation<'a> {
    /// Path template, e.g. `/api/v2/users/{id}`
    pub path: &'a str,
    /// Lowercase HTTP method
    pub method: &'a str,
    /// The operation object
    pub node: &'a Value,
    /// The enclosing path item (for path-level parameters)
    pub path_item: &'a Value,
}

impl<'a> Operation<'a> {
    /// Combined path-level and operation-level parameters
    ///
    /// `$ref` parameters that cannot be inspected inline are skipped rather
    /// than resolved - a broken `$ref` reads as an absent parameter.
    pub fn parameters(&self) -> Vec<&'a Value> {
        let mut params = Vec::new();
        for source in [self.path_item.get("parameters"), self.node.get("parameters")] {
            if let Some(list) = source.and_then(Value::as_array) {
                params.extend(list.iter().filter(|p| p.is_object() && p.get("$ref").is_none()));
            }
        }
        params
    }

    /// Query parameter names declared on this operation
    pub fn query_parameter_names(&self) -> Vec<&'a str> {
        self.parameters()
            .into_iter()
            .filter(|p| p.get("in").and_then(Value::as_str) == Some("query"))
            .filter_map(|p| p.get("name").and_then(Value::as_str))
            .collect()
    }

    /// Response entries keyed by status code string, empty when absent
    pub fn responses(&self) -> Vec<(&'a str, &'a Value)> {
        self.node
            .get("responses")
            .and_then(Value::as_object)
            .map(|m| m.iter().map(|(k, v)| (k.as_str(), v)).collect())
            .unwrap_or_default()
    }

    /// Headers declared on a given response, empty when absent
    pub fn response_headers(&self, status: &str) -> Vec<&'a str> {
        self.node
            .get("responses")
            .and_then(|r| r.get(status))
            .and_then(|r| r.get("headers"))
            .and_then(Value::as_object)
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Whether this is a collection-read endpoint: a GET on a path whose
    /// final segment is not a path parameter
    pub fn is_list_endpoint(&self) -> bool {
        if self.method != "get" {
            return false;
        }
        !self
            .path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .is_some_and(|seg| seg.starts_with('{'))
    }

    /// Dotted JSON-path style locator for findings
    pub fn json_path(&self) -> String {
        format!("paths.{}.{}", self.path, self.method)
    }
}
