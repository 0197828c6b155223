//! Types command - regenerate types from one schema file

use console::style;
use crdgen_core::{TypifyEngine, generate_types};
use std::path::Path;

use crate::error::{CliError, Result};

pub fn run(schema: &Path, namespace: &str, out: &Path) -> Result<()> {
    if namespace.trim().is_empty() {
        return Err(CliError::usage_with_help(
            "namespace must not be empty",
            "Pass the API version the schema belongs to, e.g. --namespace v1",
        ));
    }

    generate_types(&TypifyEngine::new(), schema, namespace, out)?;

    println!(
        "{} {} {} {}",
        style("✓").green().bold(),
        schema.display(),
        style("→").dim(),
        style(out.display()).green()
    );

    Ok(())
}
