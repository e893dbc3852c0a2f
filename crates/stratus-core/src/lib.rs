//! Core types for the Stratus DevOps SDK.
//!
//! This crate contains:
//! - Resource identifiers and the shared error type
//! - Declarative model schemas and the generic wire normalizer
//! - Forward-compatible wire enums
//! - Discriminator registries for polymorphic families
//! - Resource and request models (projects, repositories, pipelines,
//!   deployments, work requests)

pub mod enums;
pub mod error;
pub mod id;
pub mod model;
pub mod models;
pub mod registry;
pub mod schema;
pub mod timestamp;

pub use error::{Error, Result};
pub use id::ResourceId;
pub use model::{Lifecycle, Model};
pub use timestamp::Timestamp;

#[doc(hidden)]
pub mod __private {
    pub use serde;
    pub use tracing;
}
