//! Pipeline orchestration
//!
//! ```text
//! input.yaml ──► split ──► decode ──► extract ──► schemas/*.json ──► engine ──► apis/**/*_types.rs
//!                            │           │
//!                            ▼           ▼
//!                          skip        skip
//!                   (not applicable) (no schema)
//! ```
//!
//! Documents are processed one at a time in input order. The first fatal error
//! aborts the run; files already written stay on disk.

use std::fs;
use std::path::{Path, PathBuf};

use crate::decoder::{Decoded, DocumentDecoder, SkipReason};
use crate::error::{CrdGenError, Result};
use crate::extract::{SchemaExtractor, SchemaLayout};
use crate::identity::ResourceIdentity;
use crate::layout::OutputLayout;
use crate::registry::TypeRegistry;
use crate::split::{RawDocument, split_yaml};
use crate::typegen::{TypeEngine, generate_types};

/// Options for a generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Shape of the emitted schema documents
    pub layout: SchemaLayout,
    /// Use per-version schemas when a CRD has no top-level validation block
    pub per_version_schemas: bool,
    /// Run the type engine after writing each schema
    pub emit_types: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            layout: SchemaLayout::Standalone,
            per_version_schemas: false,
            emit_types: true,
        }
    }
}

/// Files written for one CRD
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFiles {
    pub identity: ResourceIdentity,
    pub schema_path: PathBuf,
    /// `None` when types were not requested
    pub types_path: Option<PathBuf>,
}

/// A document that produced no output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDocument {
    pub index: usize,
    pub reason: DocumentSkip,
}

/// Why a document produced no output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSkip {
    /// Not a CustomResourceDefinition
    NotApplicable(SkipReason),
    /// A CRD without an embedded validation schema
    MissingSchema(ResourceIdentity),
}

impl std::fmt::Display for DocumentSkip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotApplicable(reason) => write!(f, "{reason}"),
            Self::MissingSchema(id) => write!(f, "no openAPIV3Schema ({id})"),
        }
    }
}

/// Summary of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateReport {
    /// Number of documents in the input
    pub documents: usize,
    pub generated: Vec<GeneratedFiles>,
    pub skipped: Vec<SkippedDocument>,
}

impl GenerateReport {
    /// Get a one-line summary
    pub fn summary(&self) -> String {
        format!(
            "{} document{}, {} schema{} generated, {} skipped",
            self.documents,
            if self.documents == 1 { "" } else { "s" },
            self.generated.len(),
            if self.generated.len() == 1 { "" } else { "s" },
            self.skipped.len(),
        )
    }
}

/// Drives split → decode → extract → write → generate for an input file
pub struct Generator<E> {
    decoder: DocumentDecoder,
    extractor: SchemaExtractor,
    engine: E,
    options: GenerateOptions,
}

impl<E: TypeEngine> Generator<E> {
    /// Create a generator with the default registry
    pub fn new(engine: E) -> Self {
        Self::with_registry(TypeRegistry::with_defaults(), engine)
    }

    /// Create a generator with an explicit registry
    pub fn with_registry(registry: TypeRegistry, engine: E) -> Self {
        Self {
            decoder: DocumentDecoder::new(registry),
            extractor: SchemaExtractor::new(),
            engine,
            options: GenerateOptions::default(),
        }
    }

    /// Set run options
    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.extractor = SchemaExtractor::new()
            .with_layout(options.layout)
            .with_per_version_schemas(options.per_version_schemas);
        self.options = options;
        self
    }

    /// Read `input` and generate into `output_root`
    pub fn generate(&self, input: &Path, output_root: &Path) -> Result<GenerateReport> {
        let bytes = fs::read(input).map_err(|e| CrdGenError::io(input, e))?;
        self.generate_from_slice(&bytes, output_root)
    }

    /// Generate from in-memory YAML into `output_root`
    pub fn generate_from_slice(&self, input: &[u8], output_root: &Path) -> Result<GenerateReport> {
        let documents = split_yaml(input)?;
        let layout = OutputLayout::new(output_root);

        let mut report = GenerateReport {
            documents: documents.len(),
            ..Default::default()
        };

        for document in &documents {
            match self.process(document, &layout)? {
                Outcome::Generated(files) => report.generated.push(files),
                Outcome::Skipped(reason) => {
                    tracing::debug!("skipping document #{}: {}", document.index, reason);
                    report.skipped.push(SkippedDocument {
                        index: document.index,
                        reason,
                    });
                }
            }
        }

        Ok(report)
    }

    fn process(&self, document: &RawDocument, layout: &OutputLayout) -> Result<Outcome> {
        let crd = match self.decoder.decode(document) {
            Ok(Decoded::Crd(crd)) => crd,
            Ok(Decoded::NotApplicable(reason)) => {
                return Ok(Outcome::Skipped(DocumentSkip::NotApplicable(reason)));
            }
            Err(e) => return Err(e.in_document(document.index, None)),
        };

        let schema = match self.extractor.extract(&crd) {
            Ok(schema) => schema,
            Err(CrdGenError::MissingSchema { identity }) => {
                tracing::warn!("{identity} has no openAPIV3Schema, nothing to generate");
                return Ok(Outcome::Skipped(DocumentSkip::MissingSchema(identity)));
            }
            Err(e) => {
                let identity = crd.identity().ok();
                return Err(e.in_document(document.index, identity));
            }
        };

        let identity = schema.identity().clone();
        let wrap = |e: CrdGenError| e.in_document(document.index, Some(identity.clone()));

        layout.check(&identity).map_err(wrap)?;
        let schema_path = layout.schema_path(&identity);
        let json = schema.to_json_pretty().map_err(wrap)?;
        write_file(&schema_path, json.as_bytes()).map_err(wrap)?;

        let types_path = if self.options.emit_types {
            let types_path = layout.types_path(&identity, self.engine.file_extension());
            generate_types(&self.engine, &schema_path, &identity.version, &types_path)
                .map_err(wrap)?;
            Some(types_path)
        } else {
            None
        };

        Ok(Outcome::Generated(GeneratedFiles {
            identity,
            schema_path,
            types_path,
        }))
    }
}

enum Outcome {
    Generated(GeneratedFiles),
    Skipped(DocumentSkip),
}

/// Create the parent directory, then write the file
fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| CrdGenError::io(parent, e))?;
    }
    fs::write(path, contents).map_err(|e| CrdGenError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = GenerateOptions::default();
        assert_eq!(options.layout, SchemaLayout::Standalone);
        assert!(!options.per_version_schemas);
        assert!(options.emit_types);
    }

    #[test]
    fn test_report_summary() {
        let report = GenerateReport {
            documents: 3,
            generated: vec![GeneratedFiles {
                identity: ResourceIdentity::new("example.com", "v1", "Widget"),
                schema_path: PathBuf::from("schemas/example.com-Widget-v1-schema.json"),
                types_path: None,
            }],
            skipped: vec![SkippedDocument {
                index: 0,
                reason: DocumentSkip::NotApplicable(SkipReason::Untyped),
            }],
        };
        assert_eq!(report.summary(), "3 documents, 1 schema generated, 1 skipped");
    }

    #[test]
    fn test_skip_display() {
        let skip = DocumentSkip::MissingSchema(ResourceIdentity::new("example.com", "v1", "Widget"));
        assert_eq!(skip.to_string(), "no openAPIV3Schema (example.com/v1, Kind=Widget)");
    }
}
