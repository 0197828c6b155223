//! Two-phase document decoder
//!
//! A document is first read loosely to find its `apiVersion` and `kind`, then
//! dispatched through the [`TypeRegistry`] to a strict decoder for that exact
//! identity. Kinds that are not CustomResourceDefinitions come back as
//! [`Decoded::NotApplicable`] instead of an error.

use crate::crd::CrdObject;
use crate::error::{CrdGenError, Result};
use crate::identity::{ResourceIdentity, TypeMeta};
use crate::registry::{RegisteredType, TypeRegistry};
use crate::split::RawDocument;

/// Outcome of decoding one document
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// The document is a CustomResourceDefinition
    Crd(Box<CrdObject>),
    /// The document has nothing to generate from
    NotApplicable(SkipReason),
}

/// Why a document was not applicable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Empty or `null` document
    Empty,
    /// No `apiVersion`/`kind` envelope
    Untyped,
    /// A recognized kind without an embedded schema
    Known(ResourceIdentity),
    /// A kind missing from the registry
    Unregistered(ResourceIdentity),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty document"),
            Self::Untyped => write!(f, "no apiVersion/kind"),
            Self::Known(id) => write!(f, "not a CRD ({id})"),
            Self::Unregistered(id) => write!(f, "unregistered kind ({id})"),
        }
    }
}

/// Decodes raw documents against a fixed registry
#[derive(Debug, Clone)]
pub struct DocumentDecoder {
    registry: TypeRegistry,
}

impl DocumentDecoder {
    pub fn new(registry: TypeRegistry) -> Self {
        Self { registry }
    }

    /// Decode a raw YAML document
    pub fn decode(&self, document: &RawDocument) -> Result<Decoded> {
        if document.is_empty() {
            return Ok(Decoded::NotApplicable(SkipReason::Empty));
        }

        let value: serde_json::Value = serde_yaml::from_slice(&document.bytes)?;
        self.decode_value(value)
    }

    /// Decode a document already converted to JSON
    pub fn decode_value(&self, value: serde_json::Value) -> Result<Decoded> {
        if value.is_null() {
            return Ok(Decoded::NotApplicable(SkipReason::Empty));
        }

        let Some(identity) = TypeMeta::from_value(&value).and_then(|meta| meta.identity()) else {
            return Ok(Decoded::NotApplicable(SkipReason::Untyped));
        };

        match self.registry.lookup(&identity) {
            Some(RegisteredType::CustomResourceDefinition(decode)) => {
                let crd = decode(value).map_err(|e| CrdGenError::Decode {
                    identity,
                    message: e.to_string(),
                })?;
                tracing::debug!("decoded {} as {}", crd.name, crd.decoded_as);
                Ok(Decoded::Crd(Box::new(crd)))
            }
            Some(RegisteredType::Known) => Ok(Decoded::NotApplicable(SkipReason::Known(identity))),
            None => Ok(Decoded::NotApplicable(SkipReason::Unregistered(identity))),
        }
    }
}

impl Default for DocumentDecoder {
    fn default() -> Self {
        Self::new(TypeRegistry::with_defaults())
    }
}
