//! Decoded CustomResourceDefinition representation
//!
//! Both supported apiextensions versions decode into `CrdObject`, a simplified
//! view holding only what schema extraction needs.

use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1 as apiextensions_v1;

use super::{APIEXTENSIONS_GROUP, CRD_KIND, v1beta1};
use crate::error::{CrdGenError, Result};
use crate::identity::ResourceIdentity;

/// An embedded OpenAPI schema, kept as an untyped JSON object so that it can
/// be copied verbatim
pub type JsonSchemaTree = serde_json::Map<String, serde_json::Value>;

/// A decoded CustomResourceDefinition
#[derive(Debug, Clone, PartialEq)]
pub struct CrdObject {
    /// Full CRD name (e.g., "widgets.example.com")
    pub name: String,
    /// Identity of the apiextensions type the document was decoded as
    pub decoded_as: ResourceIdentity,
    /// API group (e.g., "example.com")
    pub group: String,
    /// Resource names (kind, plural, singular, shortNames)
    pub names: CrdNames,
    /// Singular `spec.version` (v1beta1 only)
    pub version: Option<String>,
    /// Declared versions, in document order
    pub versions: Vec<CrdVersion>,
    /// Top-level `spec.validation.openAPIV3Schema` (v1beta1 only)
    pub validation: Option<JsonSchemaTree>,
}

/// CRD naming information
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CrdNames {
    /// Kind (e.g., "Widget")
    pub kind: String,
    /// Plural name (e.g., "widgets")
    pub plural: String,
    /// Singular name (e.g., "widget")
    pub singular: Option<String>,
    /// List kind (e.g., "WidgetList")
    pub list_kind: Option<String>,
    /// Short names for kubectl
    pub short_names: Vec<String>,
}

/// A single declared version of a CRD
#[derive(Debug, Clone, PartialEq)]
pub struct CrdVersion {
    /// Version name (e.g., "v1", "v1alpha1")
    pub name: String,
    /// Whether this version is served by the API server
    pub served: bool,
    /// Whether this is the storage version
    pub storage: bool,
    /// Per-version `schema.openAPIV3Schema`
    pub schema: Option<JsonSchemaTree>,
}

impl CrdObject {
    /// Kind declared by the CRD
    pub fn kind(&self) -> &str {
        &self.names.kind
    }

    /// The version output is generated for
    ///
    /// The singular `spec.version` wins when set; otherwise the first entry of
    /// `spec.versions` as declared.
    pub fn selected_version(&self) -> Result<&str> {
        if let Some(version) = self.version.as_deref().filter(|v| !v.is_empty()) {
            return Ok(version);
        }

        let first = self.versions.first().ok_or_else(|| {
            CrdGenError::extraction(format!(
                "CRD '{}' declares neither spec.version nor spec.versions",
                self.name
            ))
        })?;

        if first.name.is_empty() {
            return Err(CrdGenError::extraction(format!(
                "CRD '{}' has an unnamed first entry in spec.versions",
                self.name
            )));
        }

        Ok(&first.name)
    }

    /// Group/version/kind of the resources this CRD defines
    pub fn identity(&self) -> Result<ResourceIdentity> {
        if self.names.kind.is_empty() {
            return Err(CrdGenError::extraction(format!(
                "CRD '{}' has an empty spec.names.kind",
                self.name
            )));
        }

        Ok(ResourceIdentity::new(
            self.group.clone(),
            self.selected_version()?,
            self.names.kind.clone(),
        ))
    }

    /// Get a declared version by name
    pub fn version_named(&self, name: &str) -> Option<&CrdVersion> {
        self.versions.iter().find(|v| v.name == name)
    }
}

impl From<v1beta1::CustomResourceDefinition> for CrdObject {
    fn from(crd: v1beta1::CustomResourceDefinition) -> Self {
        let spec = crd.spec;

        Self {
            name: crd.metadata.name.unwrap_or_default(),
            decoded_as: ResourceIdentity::new(APIEXTENSIONS_GROUP, "v1beta1", CRD_KIND),
            group: spec.group,
            names: CrdNames {
                kind: spec.names.kind,
                plural: spec.names.plural,
                singular: spec.names.singular,
                list_kind: spec.names.list_kind,
                short_names: spec.names.short_names,
            },
            version: spec.version,
            versions: spec
                .versions
                .into_iter()
                .map(|v| CrdVersion {
                    name: v.name,
                    served: v.served,
                    storage: v.storage,
                    schema: v.schema.and_then(|s| s.open_api_v3_schema),
                })
                .collect(),
            validation: spec.validation.and_then(|v| v.open_api_v3_schema),
        }
    }
}

impl TryFrom<apiextensions_v1::CustomResourceDefinition> for CrdObject {
    type Error = serde_json::Error;

    fn try_from(crd: apiextensions_v1::CustomResourceDefinition) -> std::result::Result<Self, Self::Error> {
        let spec = crd.spec;

        let versions = spec
            .versions
            .into_iter()
            .map(|v| {
                let schema = v
                    .schema
                    .and_then(|s| s.open_api_v3_schema)
                    .map(schema_props_to_tree)
                    .transpose()?;
                Ok(CrdVersion {
                    name: v.name,
                    served: v.served,
                    storage: v.storage,
                    schema,
                })
            })
            .collect::<std::result::Result<Vec<_>, serde_json::Error>>()?;

        Ok(Self {
            name: crd.metadata.name.unwrap_or_default(),
            decoded_as: ResourceIdentity::of::<apiextensions_v1::CustomResourceDefinition>(),
            group: spec.group,
            names: CrdNames {
                kind: spec.names.kind,
                plural: spec.names.plural,
                singular: spec.names.singular,
                list_kind: spec.names.list_kind,
                short_names: spec.names.short_names.unwrap_or_default(),
            },
            version: None,
            versions,
            validation: None,
        })
    }
}

fn schema_props_to_tree(
    props: apiextensions_v1::JSONSchemaProps,
) -> std::result::Result<JsonSchemaTree, serde_json::Error> {
    match serde_json::to_value(props)? {
        serde_json::Value::Object(tree) => Ok(tree),
        other => Err(serde::de::Error::custom(format!(
            "openAPIV3Schema serialized to a non-object: {other}"
        ))),
    }
}
