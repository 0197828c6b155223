//! Schema extraction
//!
//! Turns the OpenAPI v3 schema embedded in a CRD into a standalone draft-07
//! JSON Schema document. The tree is copied verbatim; only the top-level
//! `$schema` and `title` are rewritten.

use serde_json::{Map, Value, json};

use crate::crd::{CrdObject, JsonSchemaTree};
use crate::error::{CrdGenError, Result};
use crate::identity::ResourceIdentity;

/// Meta-schema URI written into every extracted document
pub const DRAFT_07_SCHEMA_URI: &str = "http://json-schema.org/draft-07/schema#";

/// Shape of the emitted schema document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaLayout {
    /// The CRD schema itself, retargeted at draft-07
    #[default]
    Standalone,
    /// The CRD schema nested under `definitions.<Kind>` and referenced by `$ref`
    Definitions,
}

impl SchemaLayout {
    /// Parse from string representation
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "standalone" => Some(Self::Standalone),
            "definitions" => Some(Self::Definitions),
            _ => None,
        }
    }
}

impl std::fmt::Display for SchemaLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standalone => write!(f, "standalone"),
            Self::Definitions => write!(f, "definitions"),
        }
    }
}

/// A standalone JSON Schema extracted from one CRD
#[derive(Debug, Clone, PartialEq)]
pub struct JsonSchemaDocument {
    identity: ResourceIdentity,
    schema: Value,
}

impl JsonSchemaDocument {
    /// Identity of the resource the schema describes
    pub fn identity(&self) -> &ResourceIdentity {
        &self.identity
    }

    /// The schema as a JSON value
    pub fn as_value(&self) -> &Value {
        &self.schema
    }

    /// Serialize with sorted keys and two-space indentation
    ///
    /// Output is byte-identical across runs for the same input.
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut out = serde_json::to_string_pretty(&canonicalize(&self.schema))
            .map_err(|e| CrdGenError::SchemaExtraction {
                identity: Some(self.identity.clone()),
                message: format!("failed to marshal json: {e}"),
            })?;
        out.push('\n');
        Ok(out)
    }
}

/// Extracts JSON Schema documents from decoded CRDs
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaExtractor {
    layout: SchemaLayout,
    per_version_schemas: bool,
}

impl SchemaExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output layout
    pub fn with_layout(mut self, layout: SchemaLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Fall back to the selected version's own schema when the CRD has no
    /// top-level validation block
    pub fn with_per_version_schemas(mut self, enabled: bool) -> Self {
        self.per_version_schemas = enabled;
        self
    }

    /// Extract the schema from a CRD
    ///
    /// Fails with [`CrdGenError::MissingSchema`] when the CRD embeds no
    /// validation schema.
    pub fn extract(&self, crd: &CrdObject) -> Result<JsonSchemaDocument> {
        let identity = crd.identity()?;
        let tree = self.locate_schema(crd, &identity)?;

        tracing::info!(
            "extracting schema for {}/{} {}",
            identity.group,
            identity.version,
            identity.kind
        );

        let schema = match self.layout {
            SchemaLayout::Standalone => standalone(tree.clone(), &identity.kind),
            SchemaLayout::Definitions => with_definitions(tree.clone(), &identity.kind),
        };

        Ok(JsonSchemaDocument { identity, schema })
    }

    fn locate_schema<'a>(
        &self,
        crd: &'a CrdObject,
        identity: &ResourceIdentity,
    ) -> Result<&'a JsonSchemaTree> {
        if let Some(tree) = &crd.validation {
            return Ok(tree);
        }

        if self.per_version_schemas
            && let Some(tree) = crd
                .version_named(&identity.version)
                .and_then(|v| v.schema.as_ref())
        {
            return Ok(tree);
        }

        Err(CrdGenError::MissingSchema {
            identity: identity.clone(),
        })
    }
}

fn standalone(mut tree: JsonSchemaTree, kind: &str) -> Value {
    tree.insert("$schema".to_string(), Value::String(DRAFT_07_SCHEMA_URI.to_string()));
    tree.insert("title".to_string(), Value::String(kind.to_string()));
    Value::Object(tree)
}

fn with_definitions(mut tree: JsonSchemaTree, kind: &str) -> Value {
    tree.insert("type".to_string(), Value::String("object".to_string()));
    tree.insert("description".to_string(), Value::String(kind.to_string()));

    json!({
        "$schema": DRAFT_07_SCHEMA_URI,
        "$id": kind,
        "$ref": format!("#/definitions/{kind}"),
        "title": kind,
        "definitions": { kind: Value::Object(tree) },
    })
}

/// Rebuild a value with every object's keys in sorted order
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), canonicalize(v)))
                    .collect::<Map<_, _>>(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}
