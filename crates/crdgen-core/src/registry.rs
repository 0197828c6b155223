//! Type registry for the document decoder
//!
//! Maps a document's (group, version, kind) to the way it is decoded. The
//! registry is built once, before any document is read, and only consulted
//! afterwards.

use std::collections::HashMap;

use k8s_openapi::api::core::v1 as core_v1;
use k8s_openapi::api::{apps, batch, networking, rbac};
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1 as apiextensions_v1;

use crate::crd::{APIEXTENSIONS_GROUP, CRD_KIND, CrdObject, v1beta1};
use crate::identity::ResourceIdentity;

/// Strict decoder for a registered CRD identity
pub type CrdDecodeFn = fn(serde_json::Value) -> Result<CrdObject, serde_json::Error>;

/// How a registered identity is handled
#[derive(Clone, Copy)]
pub enum RegisteredType {
    /// A CustomResourceDefinition, decoded strictly by the given function
    CustomResourceDefinition(CrdDecodeFn),
    /// A recognized kind that carries no schema to extract
    Known,
}

impl std::fmt::Debug for RegisteredType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CustomResourceDefinition(_) => write!(f, "CustomResourceDefinition"),
            Self::Known => write!(f, "Known"),
        }
    }
}

/// Lookup table from identity to registered type
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: HashMap<ResourceIdentity, RegisteredType>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with only the CustomResourceDefinition types
    pub fn crds_only() -> Self {
        let mut registry = Self::new();
        registry.register_crd(
            ResourceIdentity::new(APIEXTENSIONS_GROUP, "v1beta1", CRD_KIND),
            decode_v1beta1,
        );
        registry.register_crd(
            ResourceIdentity::of::<apiextensions_v1::CustomResourceDefinition>(),
            decode_v1,
        );
        registry
    }

    /// Registry with the CRD types and the common built-in kinds
    pub fn with_defaults() -> Self {
        let mut registry = Self::crds_only();

        registry.register_known::<core_v1::ConfigMap>();
        registry.register_known::<core_v1::Secret>();
        registry.register_known::<core_v1::Service>();
        registry.register_known::<core_v1::ServiceAccount>();
        registry.register_known::<core_v1::Namespace>();
        registry.register_known::<core_v1::Pod>();
        registry.register_known::<core_v1::PersistentVolumeClaim>();
        registry.register_known::<apps::v1::Deployment>();
        registry.register_known::<apps::v1::StatefulSet>();
        registry.register_known::<apps::v1::DaemonSet>();
        registry.register_known::<batch::v1::Job>();
        registry.register_known::<batch::v1::CronJob>();
        registry.register_known::<rbac::v1::Role>();
        registry.register_known::<rbac::v1::RoleBinding>();
        registry.register_known::<rbac::v1::ClusterRole>();
        registry.register_known::<rbac::v1::ClusterRoleBinding>();
        registry.register_known::<networking::v1::Ingress>();
        registry.register_known::<networking::v1::NetworkPolicy>();

        registry
    }

    /// Register a CRD identity with its strict decoder
    pub fn register_crd(&mut self, identity: ResourceIdentity, decode: CrdDecodeFn) {
        self.types
            .insert(identity, RegisteredType::CustomResourceDefinition(decode));
    }

    /// Register a typed built-in resource as recognized but irrelevant
    pub fn register_known<K: k8s_openapi::Resource>(&mut self) {
        self.types
            .insert(ResourceIdentity::of::<K>(), RegisteredType::Known);
    }

    /// Look up how an identity is handled
    pub fn lookup(&self, identity: &ResourceIdentity) -> Option<RegisteredType> {
        self.types.get(identity).copied()
    }

    /// Number of registered identities
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

fn decode_v1beta1(value: serde_json::Value) -> Result<CrdObject, serde_json::Error> {
    let crd: v1beta1::CustomResourceDefinition = serde_json::from_value(value)?;
    crd.check_schemas()?;
    Ok(crd.into())
}

fn decode_v1(value: serde_json::Value) -> Result<CrdObject, serde_json::Error> {
    let crd: apiextensions_v1::CustomResourceDefinition = serde_json::from_value(value)?;
    CrdObject::try_from(crd)
}
