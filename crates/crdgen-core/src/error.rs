//! Error types for crdgen-core

use std::path::PathBuf;

use thiserror::Error;

use crate::identity::ResourceIdentity;

/// Result type for crdgen-core operations
pub type Result<T> = std::result::Result<T, CrdGenError>;

/// Errors that can occur while turning CRD manifests into schemas and types
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CrdGenError {
    /// The input is not well-formed YAML
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A document declares a CustomResourceDefinition but does not decode as one
    #[error("failed to decode {identity}: {message}")]
    Decode {
        identity: ResourceIdentity,
        message: String,
    },

    /// The CRD carries no `spec.validation.openAPIV3Schema`
    #[error("{identity} has no embedded openAPIV3Schema")]
    MissingSchema { identity: ResourceIdentity },

    /// Any other failure while building the JSON Schema document
    #[error("failed to extract schema{}: {message}", describe(.identity.as_ref()))]
    SchemaExtraction {
        identity: Option<ResourceIdentity>,
        message: String,
    },

    /// The type generation engine failed
    #[error("failed to generate types from '{}': {message}", .schema.display())]
    TypeGen { schema: PathBuf, message: String },

    /// Filesystem failure
    #[error("IO error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A per-document failure, wrapped with its position in the input
    #[error("document #{index}{}: {source}", describe(.identity.as_ref()))]
    InDocument {
        index: usize,
        identity: Option<ResourceIdentity>,
        #[source]
        source: Box<CrdGenError>,
    },
}

fn describe(identity: Option<&ResourceIdentity>) -> String {
    identity.map(|id| format!(" ({id})")).unwrap_or_default()
}

/// Pipeline stage an error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Parse,
    Decode,
    Extract,
    TypeGen,
    Io,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse => write!(f, "parse"),
            Self::Decode => write!(f, "decode"),
            Self::Extract => write!(f, "extract"),
            Self::TypeGen => write!(f, "generate-types"),
            Self::Io => write!(f, "write"),
        }
    }
}

impl CrdGenError {
    /// Create an IO error for a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an extraction error not yet tied to an identity
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::SchemaExtraction {
            identity: None,
            message: message.into(),
        }
    }

    /// Wrap this error with the document it came from
    pub fn in_document(self, index: usize, identity: Option<ResourceIdentity>) -> Self {
        Self::InDocument {
            index,
            identity,
            source: Box::new(self),
        }
    }

    /// The innermost error, looking through document wrappers
    pub fn root(&self) -> &CrdGenError {
        match self {
            Self::InDocument { source, .. } => source.root(),
            other => other,
        }
    }

    /// Stage of the pipeline that failed
    pub fn stage(&self) -> Stage {
        match self.root() {
            Self::Parse(_) => Stage::Parse,
            Self::Decode { .. } => Stage::Decode,
            Self::MissingSchema { .. } | Self::SchemaExtraction { .. } => Stage::Extract,
            Self::TypeGen { .. } => Stage::TypeGen,
            Self::Io { .. } => Stage::Io,
            Self::InDocument { .. } => unreachable!("root() never returns a wrapper"),
        }
    }

    /// Whether the pipeline skips the document instead of aborting
    pub fn is_skippable(&self) -> bool {
        matches!(self.root(), Self::MissingSchema { .. })
    }
}
