//! Display formatting for CLI output

use console::style;
use crdgen_core::GenerateReport;
use std::path::Path;

/// Print the command banner with source and target paths
pub fn print_header(title: &str, input: &Path, output: &Path) {
    println!();
    println!(
        "  {} {} {}",
        style("crdgen").bold().cyan(),
        style("─").dim(),
        style(title).dim()
    );
    println!();
    println!("  {} {}", style("Source:").dim(), style(input.display()).cyan());
    println!("  {} {}", style("Target:").dim(), style(output.display()).green());
    println!();
}

/// Print generated files relative to the output root, then skipped documents
pub fn print_report(report: &GenerateReport, output_root: &Path) {
    println!("  {}", style("Generated Files").bold());
    println!("  {}", style("───────────────").dim());

    if report.generated.is_empty() {
        println!("  {}", style("(none)").dim());
    }

    for files in &report.generated {
        let schema = files
            .schema_path
            .strip_prefix(output_root)
            .unwrap_or(&files.schema_path);
        println!(
            "  {} {} {}",
            style("✓").green().bold(),
            schema.display(),
            style(format!("({})", files.identity)).dim()
        );
        if let Some(types) = &files.types_path {
            let types = types.strip_prefix(output_root).unwrap_or(types);
            println!("  {} {}", style("✓").green().bold(), types.display());
        }
    }

    if !report.skipped.is_empty() {
        println!();
        println!("  {}", style("Skipped Documents").bold().yellow());
        println!("  {}", style("─────────────────").dim());

        for skipped in &report.skipped {
            println!(
                "  {} #{} {}",
                style("○").yellow(),
                skipped.index,
                style(&skipped.reason).dim()
            );
        }
    }

    println!();
}

/// Print the closing line with the resolved output path
pub fn print_success(summary: &str, output_root: &Path) {
    println!("  {} {}", style("✓").green().bold(), summary);
    println!(
        "  {} {}",
        style("Output written to").dim(),
        style(output_root.display()).green()
    );
    println!();
}
