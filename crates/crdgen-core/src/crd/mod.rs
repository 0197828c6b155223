//! CustomResourceDefinition models
//!
//! - **Object** (`object`): the decoded `CrdObject` consumed by schema extraction
//! - **v1beta1** (`v1beta1`): wire model for `apiextensions.k8s.io/v1beta1`
//!
//! `apiextensions.k8s.io/v1` documents decode through `k8s_openapi`'s typed
//! CRD and are converted into the same `CrdObject`.

mod object;
pub mod v1beta1;

pub use object::{CrdNames, CrdObject, CrdVersion, JsonSchemaTree};

/// Kind shared by every CRD document
pub const CRD_KIND: &str = "CustomResourceDefinition";

/// API group of CRD documents
pub const APIEXTENSIONS_GROUP: &str = "apiextensions.k8s.io";
