//! crdgen core - Kubernetes CRDs to JSON Schema and Rust types
//!
//! This crate turns CustomResourceDefinition manifests into standalone
//! draft-07 JSON Schema files and generated Rust types:
//!
//! - **Splitting** (`split`): multi-document YAML into single documents
//! - **Registry** (`registry`): which (group, version, kind) decodes how
//! - **Decoding** (`decoder`): envelope first, then a strict CRD decode
//! - **Extraction** (`extract`): the embedded OpenAPI schema, retargeted at draft-07
//! - **Type generation** (`typegen`): a pluggable schema-to-type engine
//! - **Pipeline** (`pipeline`): output paths and per-document sequencing
//!
//! # Output layout
//!
//! ```text
//! <out>/schemas/<group>-<Kind>-<version>-schema.json
//! <out>/apis/<group>/<version>/<kind>_types.rs
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use crdgen_core::{Generator, TypifyEngine};
//!
//! let report = Generator::new(TypifyEngine::new())
//!     .generate(Path::new("crds.yaml"), Path::new("./generated"))
//!     .unwrap();
//!
//! for files in &report.generated {
//!     println!("{} -> {}", files.identity, files.schema_path.display());
//! }
//! ```

pub mod crd;
pub mod decoder;
pub mod error;
pub mod extract;
pub mod identity;
pub mod layout;
pub mod pipeline;
pub mod registry;
pub mod split;
pub mod typegen;

// Re-exports
pub use crd::{CrdNames, CrdObject, CrdVersion, JsonSchemaTree};
pub use decoder::{Decoded, DocumentDecoder, SkipReason};
pub use error::{CrdGenError, Result, Stage};
pub use extract::{DRAFT_07_SCHEMA_URI, JsonSchemaDocument, SchemaExtractor, SchemaLayout};
pub use identity::{ResourceIdentity, TypeMeta};
pub use layout::OutputLayout;
pub use pipeline::{
    DocumentSkip, GenerateOptions, GenerateReport, GeneratedFiles, Generator, SkippedDocument,
};
pub use registry::{RegisteredType, TypeRegistry};
pub use split::{RawDocument, split_yaml};
pub use typegen::{EngineError, TypeEngine, TypifyEngine, generate_types};
