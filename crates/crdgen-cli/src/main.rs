//! crdgen CLI - JSON Schemas and Rust types from Kubernetes CRDs

use clap::{Parser, Subcommand, ValueEnum};
use crdgen_core::SchemaLayout;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;
mod display;
mod error;
mod exit_codes;

#[derive(Parser)]
#[command(name = "crdgen")]
#[command(author = "crdgen Contributors")]
#[command(version)]
#[command(about = "Generate JSON Schemas and Rust types from Kubernetes CRDs", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a schema and a types file for every CRD in a manifest
    Generate {
        #[command(flatten)]
        args: GenerateArgs,
    },

    /// Write schema files only
    Schema {
        #[command(flatten)]
        args: GenerateArgs,
    },

    /// Regenerate types from one schema file
    Types {
        /// JSON Schema file
        #[arg(short, long)]
        schema: PathBuf,

        /// Module the generated types are placed in (usually the API version)
        #[arg(short, long)]
        namespace: String,

        /// Output file
        #[arg(short, long)]
        out: PathBuf,
    },
}

#[derive(clap::Args)]
struct GenerateArgs {
    /// Multi-document YAML file containing CRDs
    #[arg(short = 'i', long = "in", env = "CRDGEN_IN")]
    input: PathBuf,

    /// Output root directory
    #[arg(short = 't', long = "to", env = "CRDGEN_TO")]
    to: PathBuf,

    /// Shape of the emitted schema documents
    #[arg(long, value_enum, default_value_t = LayoutArg::Standalone, env = "CRDGEN_LAYOUT")]
    layout: LayoutArg,

    /// Fall back to per-version schemas when a CRD has no top-level validation
    #[arg(long)]
    per_version_schemas: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    /// The CRD schema itself
    Standalone,
    /// The CRD schema under `definitions.<Kind>`
    Definitions,
}

impl From<LayoutArg> for SchemaLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Standalone => SchemaLayout::Standalone,
            LayoutArg::Definitions => SchemaLayout::Definitions,
        }
    }
}

fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() {
                exit_codes::USAGE_ERROR
            } else {
                exit_codes::SUCCESS
            };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    init_logging(cli.debug);

    if let Err(err) = run(cli) {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> error::Result<()> {
    match cli.command {
        Commands::Generate { args } => commands::generate::run(&args.options(true)),
        Commands::Schema { args } => commands::generate::run(&args.options(false)),
        Commands::Types {
            schema,
            namespace,
            out,
        } => commands::types::run(&schema, &namespace, &out),
    }
}

impl GenerateArgs {
    fn options(self, emit_types: bool) -> commands::generate::RunOptions {
        commands::generate::RunOptions {
            input: self.input,
            output_root: self.to,
            options: crdgen_core::GenerateOptions {
                layout: self.layout.into(),
                per_version_schemas: self.per_version_schemas,
                emit_types,
            },
        }
    }
}

/// Log to stderr; `RUST_LOG` overrides the level picked from `--debug`
fn init_logging(debug: bool) {
    let default = if debug {
        "crdgen=debug,crdgen_core=debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(debug),
        )
        .try_init();

    tracing::debug!("debug logging enabled");
}
