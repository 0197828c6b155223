//! Group/Version/Kind identities and the `{apiVersion, kind}` envelope

use serde::Deserialize;

/// Kubernetes' three-part identity for an API type
///
/// Used both as the registry key for decoding and as the basis for output
/// file names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceIdentity {
    /// API group (empty for the core group)
    pub group: String,
    /// API version (e.g., "v1", "v1beta1")
    pub version: String,
    /// Kind (e.g., "Widget")
    pub kind: String,
}

impl ResourceIdentity {
    pub fn new(group: impl Into<String>, version: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
        }
    }

    /// Build from an `apiVersion` string (`group/version` or bare `version`)
    pub fn from_api_version(api_version: &str, kind: impl Into<String>) -> Self {
        let (group, version) = match api_version.split_once('/') {
            Some((group, version)) => (group, version),
            None => ("", api_version),
        };
        Self::new(group, version, kind)
    }

    /// Identity of a typed `k8s_openapi` resource
    pub fn of<K: k8s_openapi::Resource>() -> Self {
        Self::new(K::GROUP, K::VERSION, K::KIND)
    }

    /// The `apiVersion` form of group and version
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

impl std::fmt::Display for ResourceIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, Kind={}", self.api_version(), self.kind)
    }
}

/// Minimal type metadata read before the concrete type is known
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeMeta {
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
}

impl TypeMeta {
    /// Read the envelope from a loosely-typed document
    ///
    /// Returns `None` when the document is not an object or lacks either field.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        let meta = Self::deserialize(value).ok()?;
        (meta.api_version.is_some() && meta.kind.is_some()).then_some(meta)
    }

    /// The identity this envelope declares
    pub fn identity(&self) -> Option<ResourceIdentity> {
        match (&self.api_version, &self.kind) {
            (Some(api_version), Some(kind)) => {
                Some(ResourceIdentity::from_api_version(api_version, kind.clone()))
            }
            _ => None,
        }
    }
}
