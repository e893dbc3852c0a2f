//! The `Model` trait shared by every payload type.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::schema::ModelSchema;
use crate::{Error, Result};

/// A request or response payload described by a [`ModelSchema`].
///
/// Decoding always goes through [`ModelSchema::normalize`], so callers may
/// build a model from either native or wire spellings. Encoding produces the
/// wire form and leaves out unset optional fields.
pub trait Model: Serialize + DeserializeOwned + Sized {
    fn schema() -> &'static ModelSchema;

    /// Decode from a JSON object.
    fn from_value(value: Value) -> Result<Self> {
        let schema = Self::schema();
        let Value::Object(map) = value else {
            return Err(Error::NotAnObject { model: schema.name });
        };
        let normalized = schema.normalize(map)?;
        Ok(serde_json::from_value(Value::Object(normalized))?)
    }

    /// Decode from JSON text.
    fn from_json(text: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(text)?)
    }

    /// Encode to a wire-keyed JSON object.
    fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Resources that report a lifecycle state (or, for work requests, a status).
pub trait Lifecycle {
    fn lifecycle_state(&self) -> Option<&str>;
}
