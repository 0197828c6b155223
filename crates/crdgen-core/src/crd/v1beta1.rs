//! Serde model of `apiextensions.k8s.io/v1beta1` CustomResourceDefinition
//!
//! `k8s-openapi` no longer ships the v1beta1 API, which is the shape that
//! carries a top-level `spec.version` and `spec.validation` block.
//! Only the fields crdgen reads are modelled; unknown fields are ignored.

use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::JSONSchemaProps;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::Deserialize;
use serde::de::Error as _;

use super::object::JsonSchemaTree;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomResourceDefinition {
    #[serde(default)]
    pub metadata: ObjectMeta,
    pub spec: CustomResourceDefinitionSpec,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomResourceDefinitionSpec {
    pub group: String,
    pub names: CustomResourceDefinitionNames,
    #[serde(default)]
    pub scope: Option<String>,
    /// Deprecated singular version; wins over `versions` when set
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub versions: Vec<CustomResourceDefinitionVersion>,
    #[serde(default)]
    pub validation: Option<CustomResourceValidation>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomResourceDefinitionNames {
    pub kind: String,
    pub plural: String,
    #[serde(default)]
    pub singular: Option<String>,
    #[serde(default)]
    pub list_kind: Option<String>,
    #[serde(default)]
    pub short_names: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomResourceDefinitionVersion {
    pub name: String,
    #[serde(default)]
    pub served: bool,
    #[serde(default)]
    pub storage: bool,
    #[serde(default)]
    pub schema: Option<CustomResourceValidation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomResourceValidation {
    #[serde(rename = "openAPIV3Schema", default)]
    pub open_api_v3_schema: Option<JsonSchemaTree>,
}

impl CustomResourceDefinition {
    /// Decode every embedded schema into the typed `JSONSchemaProps` model
    ///
    /// The trees themselves stay untyped so they can be copied verbatim; this
    /// only rejects schemas the API server would reject, such as a
    /// non-string `type` or a non-list `required`.
    pub fn check_schemas(&self) -> Result<(), serde_json::Error> {
        let top_level = self
            .spec
            .validation
            .as_ref()
            .and_then(|v| v.open_api_v3_schema.as_ref())
            .map(|tree| ("spec.validation.openAPIV3Schema".to_string(), tree));

        let per_version = self.spec.versions.iter().enumerate().filter_map(|(i, v)| {
            v.schema
                .as_ref()
                .and_then(|s| s.open_api_v3_schema.as_ref())
                .map(|tree| (format!("spec.versions[{i}].schema.openAPIV3Schema"), tree))
        });

        for (location, tree) in top_level.into_iter().chain(per_version) {
            serde_json::from_value::<JSONSchemaProps>(serde_json::Value::Object(tree.clone()))
                .map_err(|e| serde_json::Error::custom(format!("{location}: {e}")))?;
        }

        Ok(())
    }
}
