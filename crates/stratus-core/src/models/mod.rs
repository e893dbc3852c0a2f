//! Resource and request models.

use std::collections::BTreeMap;

use crate::schema::FieldKind;

pub mod build_pipeline;
pub mod commit;
pub mod deployment;
pub mod project;
pub mod repository;
pub mod stage;
pub mod work_request;

pub use build_pipeline::*;
pub use commit::*;
pub use deployment::*;
pub use project::*;
pub use repository::*;
pub use stage::*;
pub use work_request::*;

/// Simple key/value tags.
pub type FreeformTags = BTreeMap<String, String>;

/// Namespaced tags: namespace -> key -> value.
pub type DefinedTags = BTreeMap<String, BTreeMap<String, String>>;

pub(crate) const FREEFORM_TAGS: FieldKind = FieldKind::Map(&FieldKind::String);
pub(crate) const DEFINED_TAGS: FieldKind = FieldKind::Map(&FieldKind::Map(&FieldKind::String));
