//! Output path scheme
//!
//! ```text
//! <root>/schemas/<group>-<Kind>-<version>-schema.json
//! <root>/apis/<group>/<version>/<kind>_types.<ext>
//! ```

use std::path::{Path, PathBuf};

use crate::error::{CrdGenError, Result};
use crate::identity::ResourceIdentity;

/// Directory holding extracted schemas
pub const SCHEMAS_DIR: &str = "schemas";

/// Directory holding generated types
pub const APIS_DIR: &str = "apis";

/// Pure mapping from identities to output paths under a root directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Output root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory for schema files
    pub fn schemas_dir(&self) -> PathBuf {
        self.root.join(SCHEMAS_DIR)
    }

    /// Reject identities whose group, version or kind would place files
    /// outside the output root
    pub fn check(&self, identity: &ResourceIdentity) -> Result<()> {
        let fields = [
            ("group", &identity.group),
            ("version", &identity.version),
            ("kind", &identity.kind),
        ];

        for (field, value) in fields {
            if value.contains(['/', '\\']) || value.contains("..") {
                return Err(CrdGenError::SchemaExtraction {
                    identity: Some(identity.clone()),
                    message: format!("{field} '{value}' is not usable as a path component"),
                });
            }
        }

        Ok(())
    }

    /// Path of the schema file for an identity
    pub fn schema_path(&self, identity: &ResourceIdentity) -> PathBuf {
        self.schemas_dir().join(format!(
            "{}-{}-{}-schema.json",
            identity.group, identity.kind, identity.version
        ))
    }

    /// Directory for the generated types of a group/version
    pub fn types_dir(&self, identity: &ResourceIdentity) -> PathBuf {
        self.root
            .join(APIS_DIR)
            .join(&identity.group)
            .join(&identity.version)
    }

    /// Path of the generated types file for an identity
    pub fn types_path(&self, identity: &ResourceIdentity, extension: &str) -> PathBuf {
        self.types_dir(identity).join(format!(
            "{}_types.{}",
            identity.kind.to_lowercase(),
            extension
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_path() {
        let layout = OutputLayout::new("/out");
        let id = ResourceIdentity::new("example.com", "v1", "Widget");
        assert_eq!(
            layout.schema_path(&id),
            PathBuf::from("/out/schemas/example.com-Widget-v1-schema.json")
        );
    }

    #[test]
    fn test_types_path_lowercases_kind() {
        let layout = OutputLayout::new("/out");
        let id = ResourceIdentity::new("example.com", "v1alpha1", "KafkaTopic");
        assert_eq!(
            layout.types_path(&id, "rs"),
            PathBuf::from("/out/apis/example.com/v1alpha1/kafkatopic_types.rs")
        );
    }

    #[test]
    fn test_check_accepts_dotted_group() {
        let layout = OutputLayout::new("out");
        let id = ResourceIdentity::new("tools.example.com", "v1beta1", "Sprocket");
        assert!(layout.check(&id).is_ok());
    }

    #[test]
    fn test_check_rejects_escaping_components() {
        let layout = OutputLayout::new("out");
        for id in [
            ResourceIdentity::new("../../escaped", "v1", "Widget"),
            ResourceIdentity::new("example.com", "v1/../..", "Widget"),
            ResourceIdentity::new("example.com", "v1", "..\\Widget"),
            ResourceIdentity::new("example.com", "..", "Widget"),
        ] {
            let err = layout.check(&id).unwrap_err();
            assert!(matches!(err, CrdGenError::SchemaExtraction { .. }), "{id}");
            assert!(err.to_string().contains("path component"));
        }
    }

    #[test]
    fn test_distinct_versions_do_not_collide() {
        let layout = OutputLayout::new("out");
        let a = ResourceIdentity::new("example.com", "v1", "Widget");
        let b = ResourceIdentity::new("example.com", "v2", "Widget");
        assert_ne!(layout.schema_path(&a), layout.schema_path(&b));
        assert_ne!(layout.types_path(&a, "rs"), layout.types_path(&b, "rs"));
    }
}
