//! End-to-end tests for the generation pipeline

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use crdgen_core::{
    CrdGenError, DocumentSkip, EngineError, GenerateOptions, Generator, ResourceIdentity,
    SchemaLayout, SkipReason, Stage, TypeEngine, TypeRegistry, TypifyEngine,
};
use tempfile::TempDir;

/// Get the fixtures path
fn fixture(name: &str) -> PathBuf {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures")).join(name)
}

/// Engine that records its calls and echoes the namespace back
#[derive(Default)]
struct RecordingEngine {
    calls: RefCell<Vec<(PathBuf, String)>>,
    fail: bool,
}

impl TypeEngine for RecordingEngine {
    fn generate(&self, schema_path: &Path, namespace: &str) -> Result<String, EngineError> {
        if self.fail {
            return Err("engine exploded".into());
        }
        self.calls
            .borrow_mut()
            .push((schema_path.to_path_buf(), namespace.to_string()));
        Ok(format!("package {namespace}\n"))
    }

    fn file_extension(&self) -> &str {
        "go"
    }
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

mod widget_scenario {
    use super::*;

    #[test]
    fn test_widget_end_to_end_with_typify() {
        let out = TempDir::new().unwrap();

        let report = Generator::new(TypifyEngine::new())
            .generate(&fixture("widget-crd.yaml"), out.path())
            .unwrap();

        assert_eq!(report.generated.len(), 1);

        let schema_path = out.path().join("schemas/example.com-Widget-v1-schema.json");
        let types_path = out.path().join("apis/example.com/v1/widget_types.rs");
        assert!(schema_path.is_file());
        assert!(types_path.is_file());

        let schema = read_json(&schema_path);
        assert_eq!(schema["$schema"], "http://json-schema.org/draft-07/schema#");
        assert_eq!(schema["title"], "Widget");
        assert_eq!(schema["properties"]["size"]["type"], "integer");

        let types = fs::read_to_string(&types_path).unwrap();
        assert!(types.contains("pub mod v1"));
        assert!(types.contains("pub struct Widget"));
        assert!(types.contains("pub size:"));
        assert!(types.contains("i64"));
    }

    #[test]
    fn test_engine_called_once_with_version_namespace() {
        let out = TempDir::new().unwrap();
        let engine = RecordingEngine::default();

        let report = Generator::new(&engine)
            .generate(&fixture("widget-crd.yaml"), out.path())
            .unwrap();

        let calls = engine.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, out.path().join("schemas/example.com-Widget-v1-schema.json"));
        assert_eq!(calls[0].1, "v1");

        let types_path = report.generated[0].types_path.clone().unwrap();
        assert_eq!(types_path, out.path().join("apis/example.com/v1/widget_types.go"));
        assert_eq!(fs::read_to_string(types_path).unwrap(), "package v1\n");
    }

    #[test]
    fn test_schema_files_are_idempotent() {
        let out = TempDir::new().unwrap();
        let generator = Generator::new(RecordingEngine::default());
        let schema_path = out.path().join("schemas/example.com-Widget-v1-schema.json");

        generator.generate(&fixture("widget-crd.yaml"), out.path()).unwrap();
        let first = fs::read(&schema_path).unwrap();

        generator.generate(&fixture("widget-crd.yaml"), out.path()).unwrap();
        let second = fs::read(&schema_path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_schema_file_is_valid_draft7() {
        let out = TempDir::new().unwrap();
        Generator::new(RecordingEngine::default())
            .generate(&fixture("widget-crd.yaml"), out.path())
            .unwrap();

        let schema = read_json(&out.path().join("schemas/example.com-Widget-v1-schema.json"));
        let validator = jsonschema::validator_for(&schema).unwrap();
        assert!(validator.is_valid(&serde_json::json!({ "size": 4 })));
        assert!(!validator.is_valid(&serde_json::json!({ "size": "large" })));
    }
}

mod mixed_manifest {
    use super::*;

    #[test]
    fn test_non_crds_and_schemaless_crds_are_skipped() {
        let out = TempDir::new().unwrap();

        let report = Generator::new(RecordingEngine::default())
            .generate(&fixture("mixed.yaml"), out.path())
            .unwrap();

        assert_eq!(report.documents, 5);

        let generated: Vec<_> = report.generated.iter().map(|g| g.identity.clone()).collect();
        assert_eq!(
            generated,
            vec![
                ResourceIdentity::new("example.com", "v1alpha1", "Gadget"),
                ResourceIdentity::new("tools.example.com", "v1", "Sprocket"),
            ]
        );

        let skipped: Vec<_> = report.skipped.iter().map(|s| (s.index, s.reason.clone())).collect();
        assert_eq!(
            skipped,
            vec![
                (
                    0,
                    DocumentSkip::NotApplicable(SkipReason::Known(ResourceIdentity::new("", "v1", "ConfigMap")))
                ),
                (
                    2,
                    DocumentSkip::MissingSchema(ResourceIdentity::new("example.com", "v1", "Legacy"))
                ),
                (3, DocumentSkip::NotApplicable(SkipReason::Empty)),
            ]
        );

        // Nothing at all for the ConfigMap or the schemaless CRD
        let schemas: Vec<_> = fs::read_dir(out.path().join("schemas"))
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(schemas.len(), 2);
        assert!(!out.path().join("apis/example.com/v1/legacy_types.go").exists());
    }

    #[test]
    fn test_first_version_wins_without_singular_version() {
        let out = TempDir::new().unwrap();
        Generator::new(RecordingEngine::default())
            .generate(&fixture("mixed.yaml"), out.path())
            .unwrap();

        assert!(out.path().join("schemas/example.com-Gadget-v1alpha1-schema.json").is_file());
        assert!(out.path().join("apis/example.com/v1alpha1/gadget_types.go").is_file());
        assert!(!out.path().join("schemas/example.com-Gadget-v1-schema.json").exists());
    }

    #[test]
    fn test_singular_version_wins() {
        let out = TempDir::new().unwrap();
        Generator::new(RecordingEngine::default())
            .generate(&fixture("mixed.yaml"), out.path())
            .unwrap();

        assert!(out.path().join("schemas/tools.example.com-Sprocket-v1-schema.json").is_file());
        assert!(!out.path().join("schemas/tools.example.com-Sprocket-v1alpha1-schema.json").exists());
    }

    #[test]
    fn test_nested_schema_passes_through() {
        let out = TempDir::new().unwrap();
        Generator::new(RecordingEngine::default())
            .generate(&fixture("mixed.yaml"), out.path())
            .unwrap();

        let schema = read_json(&out.path().join("schemas/example.com-Gadget-v1alpha1-schema.json"));
        let spec = &schema["properties"]["spec"];
        assert_eq!(spec["description"], "Desired state of the gadget");
        assert_eq!(spec["properties"]["color"]["enum"], serde_json::json!(["red", "blue"]));
        assert_eq!(spec["properties"]["replicas"]["minimum"], 1);
        assert_eq!(schema["required"], serde_json::json!(["spec"]));
        assert_eq!(schema["title"], "Gadget");
    }

    #[test]
    fn test_configmap_then_crd_yields_one_pair() {
        let input = r#"
apiVersion: v1
kind: ConfigMap
metadata:
  name: settings
data:
  a: b
---
apiVersion: apiextensions.k8s.io/v1beta1
kind: CustomResourceDefinition
metadata:
  name: widgets.example.com
spec:
  group: example.com
  version: v1
  names:
    kind: Widget
    plural: widgets
  validation:
    openAPIV3Schema:
      type: object
"#;
        let out = TempDir::new().unwrap();
        let engine = RecordingEngine::default();

        let report = Generator::with_registry(TypeRegistry::crds_only(), &engine)
            .generate_from_slice(input.as_bytes(), out.path())
            .unwrap();

        assert_eq!(report.generated.len(), 1);
        assert_eq!(engine.calls.borrow().len(), 1);
        assert!(matches!(
            report.skipped[0].reason,
            DocumentSkip::NotApplicable(SkipReason::Unregistered(_))
        ));
    }
}

mod apiextensions_v1 {
    use super::*;

    #[test]
    fn test_per_version_schema_is_missing_by_default() {
        let out = TempDir::new().unwrap();

        let report = Generator::new(RecordingEngine::default())
            .generate(&fixture("v1-crd.yaml"), out.path())
            .unwrap();

        assert!(report.generated.is_empty());
        assert_eq!(
            report.skipped[0].reason,
            DocumentSkip::MissingSchema(ResourceIdentity::new("example.com", "v1beta2", "Gizmo"))
        );
        assert!(!out.path().join("schemas").exists());
    }

    #[test]
    fn test_per_version_schema_opt_in() {
        let out = TempDir::new().unwrap();
        let options = GenerateOptions {
            per_version_schemas: true,
            ..Default::default()
        };

        let report = Generator::new(RecordingEngine::default())
            .with_options(options)
            .generate(&fixture("v1-crd.yaml"), out.path())
            .unwrap();

        assert_eq!(report.generated.len(), 1);
        let schema = read_json(&out.path().join("schemas/example.com-Gizmo-v1beta2-schema.json"));
        assert_eq!(schema["title"], "Gizmo");
        assert_eq!(schema["properties"]["label"]["type"], "string");
    }
}

mod options {
    use super::*;

    #[test]
    fn test_schema_only_run_skips_engine() {
        let out = TempDir::new().unwrap();
        let engine = RecordingEngine::default();
        let options = GenerateOptions {
            emit_types: false,
            ..Default::default()
        };

        let report = Generator::new(&engine)
            .with_options(options)
            .generate(&fixture("widget-crd.yaml"), out.path())
            .unwrap();

        assert!(engine.calls.borrow().is_empty());
        assert_eq!(report.generated[0].types_path, None);
        assert!(out.path().join("schemas/example.com-Widget-v1-schema.json").is_file());
        assert!(!out.path().join("apis").exists());
    }

    #[test]
    fn test_definitions_layout_file() {
        let out = TempDir::new().unwrap();
        let options = GenerateOptions {
            layout: SchemaLayout::Definitions,
            emit_types: false,
            ..Default::default()
        };

        Generator::new(RecordingEngine::default())
            .with_options(options)
            .generate(&fixture("widget-crd.yaml"), out.path())
            .unwrap();

        let schema = read_json(&out.path().join("schemas/example.com-Widget-v1-schema.json"));
        assert_eq!(schema["$ref"], "#/definitions/Widget");
        assert_eq!(schema["definitions"]["Widget"]["properties"]["size"]["type"], "integer");
    }
}

mod failures {
    use super::*;

    #[test]
    fn test_malformed_crd_aborts_with_document_context() {
        let out = TempDir::new().unwrap();

        let err = Generator::new(RecordingEngine::default())
            .generate(&fixture("malformed-crd.yaml"), out.path())
            .unwrap_err();

        assert_eq!(err.stage(), Stage::Decode);
        let CrdGenError::InDocument { index, .. } = &err else {
            panic!("expected a document-wrapped error, got {err}");
        };
        assert_eq!(*index, 1);
        assert!(err.to_string().contains("document #1"));

        // The first document was already written and is left in place
        assert!(out.path().join("schemas/example.com-Widget-v1-schema.json").is_file());
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        let out = TempDir::new().unwrap();
        let err = Generator::new(RecordingEngine::default())
            .generate_from_slice(b"kind: [oops\n", out.path())
            .unwrap_err();

        assert_eq!(err.stage(), Stage::Parse);
        assert!(fs::read_dir(out.path()).unwrap().next().is_none());
    }

    #[test]
    fn test_engine_failure_keeps_schema() {
        let out = TempDir::new().unwrap();
        let engine = RecordingEngine {
            fail: true,
            ..Default::default()
        };

        let err = Generator::new(engine)
            .generate(&fixture("widget-crd.yaml"), out.path())
            .unwrap_err();

        assert_eq!(err.stage(), Stage::TypeGen);
        assert!(err.to_string().contains("engine exploded"));
        assert!(err.to_string().contains("example.com/v1, Kind=Widget"));
        assert!(out.path().join("schemas/example.com-Widget-v1-schema.json").is_file());
    }

    #[test]
    fn test_missing_input_is_io_error() {
        let out = TempDir::new().unwrap();
        let err = Generator::new(RecordingEngine::default())
            .generate(&out.path().join("nope.yaml"), out.path())
            .unwrap_err();

        assert_eq!(err.stage(), Stage::Io);
    }

    #[test]
    fn test_crd_without_versions_is_extraction_error() {
        let input = r#"
apiVersion: apiextensions.k8s.io/v1beta1
kind: CustomResourceDefinition
metadata:
  name: versionless.example.com
spec:
  group: example.com
  names:
    kind: Versionless
    plural: versionless
  validation:
    openAPIV3Schema:
      type: object
"#;
        let out = TempDir::new().unwrap();
        let err = Generator::new(RecordingEngine::default())
            .generate_from_slice(input.as_bytes(), out.path())
            .unwrap_err();

        assert_eq!(err.stage(), Stage::Extract);
        assert!(!err.is_skippable());
    }

    #[test]
    fn test_mistyped_schema_writes_nothing() {
        let input = r#"
apiVersion: apiextensions.k8s.io/v1beta1
kind: CustomResourceDefinition
metadata:
  name: widgets.example.com
spec:
  group: example.com
  version: v1
  names:
    kind: Widget
    plural: widgets
  validation:
    openAPIV3Schema:
      type: object
      required: notalist
      properties:
        size:
          type: 5
"#;
        let out = TempDir::new().unwrap();
        let err = Generator::new(RecordingEngine::default())
            .with_options(GenerateOptions {
                emit_types: false,
                ..Default::default()
            })
            .generate_from_slice(input.as_bytes(), out.path())
            .unwrap_err();

        assert_eq!(err.stage(), Stage::Decode);
        assert!(err.to_string().contains("document #0"));
        assert!(!out.path().join("schemas").exists());
    }

    #[test]
    fn test_group_escaping_output_root_is_rejected() {
        let input = r#"
apiVersion: apiextensions.k8s.io/v1beta1
kind: CustomResourceDefinition
metadata:
  name: widgets.escaped
spec:
  group: ../../escaped
  version: v1
  names:
    kind: Widget
    plural: widgets
  validation:
    openAPIV3Schema:
      type: object
"#;
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("a/b");
        let engine = RecordingEngine::default();
        let err = Generator::new(&engine)
            .generate_from_slice(input.as_bytes(), &root)
            .unwrap_err();

        assert_eq!(err.stage(), Stage::Extract);
        assert!(err.to_string().contains("../../escaped"));
        assert!(engine.calls.borrow().is_empty());
        assert!(!dir.path().join("escaped").exists());
        assert!(!root.join("schemas").exists());
    }
}

mod yaml_features {
    use super::*;

    #[test]
    fn test_merge_keys_are_resolved() {
        let input = r#"
apiVersion: apiextensions.k8s.io/v1beta1
kind: CustomResourceDefinition
metadata:
  name: widgets.example.com
spec:
  group: example.com
  version: v1
  names:
    kind: Widget
    plural: widgets
  validation:
    openAPIV3Schema:
      type: object
      properties:
        base: &base
          type: object
          properties:
            name:
              type: string
        derived:
          <<: *base
          description: derived
"#;
        let out = TempDir::new().unwrap();
        Generator::new(RecordingEngine::default())
            .generate_from_slice(input.as_bytes(), out.path())
            .unwrap();

        let schema = read_json(&out.path().join("schemas/example.com-Widget-v1-schema.json"));
        let derived = &schema["properties"]["derived"];
        assert_eq!(derived["type"], "object");
        assert_eq!(derived["description"], "derived");
        assert_eq!(derived["properties"]["name"]["type"], "string");
        assert!(derived.get("<<").is_none());
    }
}
