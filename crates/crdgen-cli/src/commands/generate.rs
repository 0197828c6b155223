//! Generate command - CRD manifests to schema and types files
//!
//! Also backs `crdgen schema`, which runs the same pipeline without the type
//! engine.

use crdgen_core::{GenerateOptions, Generator, TypifyEngine};
use std::fs;
use std::path::{Path, PathBuf};

use crate::display;
use crate::error::{CliError, Result};

/// Resolved arguments for one run
pub struct RunOptions {
    pub input: PathBuf,
    pub output_root: PathBuf,
    pub options: GenerateOptions,
}

pub fn run(run: &RunOptions) -> Result<()> {
    let input = resolve(&run.input)?;
    let output_root = resolve(&run.output_root)?;

    tracing::debug!(
        "input={} output={} layout={} per_version_schemas={} emit_types={}",
        input.display(),
        output_root.display(),
        run.options.layout,
        run.options.per_version_schemas,
        run.options.emit_types
    );

    let title = if run.options.emit_types {
        "CRD → JSON Schema → Rust"
    } else {
        "CRD → JSON Schema"
    };
    display::print_header(title, &input, &output_root);

    fs::create_dir_all(&output_root)
        .map_err(|e| CliError::io(format!("creating {}", output_root.display()), e))?;

    let report = Generator::new(TypifyEngine::new())
        .with_options(run.options)
        .generate(&input, &output_root)?;

    display::print_report(&report, &output_root);
    display::print_success(&report.summary(), &output_root);

    Ok(())
}

/// Make a path absolute against the current directory without touching the filesystem
fn resolve(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|e| CliError::io(format!("resolving {}", path.display()), e))
}
