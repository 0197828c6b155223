//! Multi-document YAML splitting
//!
//! A manifest may hold any number of `---`-separated documents. Each one is
//! parsed once by a single streaming deserializer and re-emitted as its own
//! YAML chunk, so later stages never re-scan the whole input.

use serde::Deserialize;

use crate::error::Result;

/// One YAML document from the input stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    /// Zero-based position in the input
    pub index: usize,
    /// Normalized YAML text; empty for an empty or `null` document
    pub bytes: Vec<u8>,
}

impl RawDocument {
    /// Whether this is a placeholder for an empty document
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Split a multi-document YAML stream into single documents
///
/// Order is preserved and empty documents are kept as empty placeholders.
/// `<<` merge keys are resolved before a document is re-emitted.
/// Fails on the first document that is not well-formed YAML.
pub fn split_yaml(input: &[u8]) -> Result<Vec<RawDocument>> {
    let mut documents = Vec::new();

    for (index, document) in serde_yaml::Deserializer::from_slice(input).enumerate() {
        let mut value = serde_yaml::Value::deserialize(document)?;
        value.apply_merge()?;
        let bytes = if value.is_null() {
            Vec::new()
        } else {
            serde_yaml::to_string(&value)?.into_bytes()
        };
        documents.push(RawDocument { index, bytes });
    }

    Ok(documents)
}
