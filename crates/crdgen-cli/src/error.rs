//! CLI error types with exit code handling
//!
//! Library errors are mapped by pipeline stage into diagnostics that carry a
//! help line and an exit code.

use crdgen_core::{CrdGenError, Stage};
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// The input file is not valid YAML
    #[error("parse failed: {message}")]
    #[diagnostic(code(crdgen::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// A CRD document could not be decoded
    #[error("decode failed: {message}")]
    #[diagnostic(code(crdgen::decode))]
    Decode {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Schema extraction failed
    #[error("extract failed: {message}")]
    #[diagnostic(code(crdgen::extract))]
    Schema {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// The type engine failed
    #[error("generate-types failed: {message}")]
    #[diagnostic(code(crdgen::typegen))]
    TypeGen {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(crdgen::io))]
    Io { message: String },

    /// Invalid arguments
    #[error("{message}")]
    #[diagnostic(code(crdgen::usage))]
    Usage {
        message: String,
        #[help]
        help: Option<String>,
    },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Parse { .. } => exit_codes::PARSE_ERROR,
            CliError::Decode { .. } => exit_codes::DECODE_ERROR,
            CliError::Schema { .. } => exit_codes::SCHEMA_ERROR,
            CliError::TypeGen { .. } => exit_codes::TYPEGEN_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Usage { .. } => exit_codes::USAGE_ERROR,
        }
    }

    /// Create a usage error with help text
    pub fn usage_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create an IO error with context
    pub fn io(context: impl std::fmt::Display, err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{context}: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

impl From<CrdGenError> for CliError {
    fn from(err: CrdGenError) -> Self {
        let message = err.to_string();
        match err.stage() {
            Stage::Parse => CliError::Parse {
                message,
                help: Some("Check the input for YAML syntax errors".to_string()),
            },
            Stage::Decode => CliError::Decode {
                message,
                help: Some(
                    "The document declares a CustomResourceDefinition but does not match its API shape"
                        .to_string(),
                ),
            },
            Stage::Extract => CliError::Schema {
                help: extract_help(&message),
                message,
            },
            Stage::TypeGen => CliError::TypeGen {
                message,
                help: Some(
                    "The schema file was written; rerun `crdgen types` on it once the cause is fixed"
                        .to_string(),
                ),
            },
            Stage::Io => CliError::Io { message },
        }
    }
}

/// Pick a hint matching the cause of an extraction failure
fn extract_help(message: &str) -> Option<String> {
    let help = if message.contains("spec.version") {
        "A CRD needs spec.version or a non-empty spec.versions list"
    } else if message.contains("spec.names.kind") {
        "Set spec.names.kind to the Kind the CRD defines"
    } else if message.contains("path component") {
        "group, version and kind must not contain '/', '\\' or '..'"
    } else if message.contains("openAPIV3Schema") {
        "Add spec.validation.openAPIV3Schema, or pass --per-version-schemas"
    } else {
        return None;
    };
    Some(help.to_string())
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
