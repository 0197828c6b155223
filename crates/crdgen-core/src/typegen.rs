//! Type generation from JSON Schema files
//!
//! The schema-to-type engine is a black box behind [`TypeEngine`]: it gets a
//! schema file and a namespace and returns source text. crdgen only decides
//! when to call it and where its output goes.

use std::fs;
use std::path::Path;

use quote::{format_ident, quote};
use typify::{TypeSpace, TypeSpaceSettings};

use crate::error::{CrdGenError, Result};

/// Error returned by an engine
pub type EngineError = Box<dyn std::error::Error + Send + Sync>;

/// A schema-to-type engine
pub trait TypeEngine {
    /// Generate type source for the schema at `schema_path`, scoped by `namespace`
    fn generate(&self, schema_path: &Path, namespace: &str) -> std::result::Result<String, EngineError>;

    /// File extension of the generated source (without the dot)
    fn file_extension(&self) -> &str;
}

impl<E: TypeEngine + ?Sized> TypeEngine for &E {
    fn generate(&self, schema_path: &Path, namespace: &str) -> std::result::Result<String, EngineError> {
        (**self).generate(schema_path, namespace)
    }

    fn file_extension(&self) -> &str {
        (**self).file_extension()
    }
}

/// Rust type engine backed by `typify`
///
/// The generated items are wrapped in `pub mod <namespace> { ... }`.
#[derive(Default)]
pub struct TypifyEngine {
    settings: TypeSpaceSettings,
}

impl TypifyEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TypeEngine for TypifyEngine {
    fn generate(&self, schema_path: &Path, namespace: &str) -> std::result::Result<String, EngineError> {
        let content = fs::read_to_string(schema_path)?;
        let schema: schemars::schema::RootSchema = serde_json::from_str(&content)?;

        let mut type_space = TypeSpace::new(&self.settings);
        type_space.add_root_schema(schema)?;
        let types = type_space.to_stream();

        let module = format_ident!("{}", module_name(namespace));
        let file: syn::File = syn::parse2(quote! {
            pub mod #module {
                #types
            }
        })?;

        let source_name = schema_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(format!(
            "// Code generated by crdgen from {source_name}. DO NOT EDIT.\n\n{}",
            prettyplease::unparse(&file)
        ))
    }

    fn file_extension(&self) -> &str {
        "rs"
    }
}

/// Turn a namespace such as a CRD version into a module identifier
pub fn module_name(namespace: &str) -> String {
    let mut name: String = namespace
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();

    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }

    // Reserved words cannot name a module
    if syn::parse_str::<syn::Ident>(&name).is_err() {
        name.push('_');
    }

    name
}

/// Run the engine once for a schema file and write its output to `out_path`
///
/// Parent directories of `out_path` are created as needed.
pub fn generate_types<E: TypeEngine + ?Sized>(
    engine: &E,
    schema_path: &Path,
    namespace: &str,
    out_path: &Path,
) -> Result<()> {
    let source = engine
        .generate(schema_path, namespace)
        .map_err(|e| CrdGenError::TypeGen {
            schema: schema_path.to_path_buf(),
            message: e.to_string(),
        })?;

    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent).map_err(|e| CrdGenError::io(parent, e))?;
    }
    fs::write(out_path, source).map_err(|e| CrdGenError::io(out_path, e))?;

    tracing::debug!("wrote types to {}", out_path.display());
    Ok(())
}
