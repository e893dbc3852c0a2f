//! Declarative model schemas.
//!
//! Every model declares a static [`ModelSchema`]: one [`FieldSpec`] per field
//! with its native (`snake_case`) name, its wire (`camelCase`) key, its kind and
//! whether it is required. [`ModelSchema::normalize`] is the single routine that
//! turns a caller- or service-supplied JSON object into the canonical wire form
//! the typed structs deserialize from.

use chrono::DateTime;
use serde_json::{Map, Value};
use tracing::trace;

use crate::{Error, Result};

/// Lazily resolved schema, so schemas can refer to each other (and to
/// themselves) without initialization order issues.
pub type SchemaRef = fn() -> &'static ModelSchema;

/// Semantic type of a field.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    String,
    Integer,
    Boolean,
    /// RFC 3339 timestamp carried as a string.
    Timestamp,
    /// A wire enum; any string is accepted here.
    Enum,
    /// A nested model, normalized recursively.
    Object(SchemaRef),
    /// A nested polymorphic model. Its own decoder resolves the subtype, so the
    /// value is only checked to be an object.
    Polymorphic,
    List(&'static FieldKind),
    /// String-keyed map. Keys are user data and are never renamed.
    Map(&'static FieldKind),
}

/// One field of a model.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Native `snake_case` name.
    pub name: &'static str,
    /// Wire `camelCase` key.
    pub wire: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, wire: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            wire,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, wire: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            wire,
            kind,
            required: false,
        }
    }
}

/// Field table of one model.
#[derive(Debug)]
pub struct ModelSchema {
    /// Type name, used in errors and by polymorphic registries.
    pub name: &'static str,
    /// Base model whose fields this one inherits.
    pub parent: Option<SchemaRef>,
    pub fields: &'static [FieldSpec],
}

impl ModelSchema {
    /// All fields, inherited ones first.
    pub fn fields(&self) -> Vec<&'static FieldSpec> {
        let mut fields = match self.parent {
            Some(parent) => parent().fields(),
            None => Vec::new(),
        };
        fields.extend(self.fields.iter());
        fields
    }

    /// Look up a field by either spelling.
    pub fn field(&self, key: &str) -> Option<&'static FieldSpec> {
        self.fields()
            .into_iter()
            .find(|f| f.name == key || f.wire == key)
    }

    /// Map of native name to wire key.
    pub fn attribute_map(&self) -> Vec<(&'static str, &'static str)> {
        self.fields().into_iter().map(|f| (f.name, f.wire)).collect()
    }

    /// Normalize an object into wire form.
    ///
    /// Each field may be given under its native or its wire key but not both.
    /// `null` counts as absent. Unrecognized keys are dropped.
    pub fn normalize(&self, mut input: Map<String, Value>) -> Result<Map<String, Value>> {
        let mut output = Map::new();

        for field in self.fields() {
            let native = input.remove(field.name);
            let wire = if field.wire == field.name {
                None
            } else {
                input.remove(field.wire)
            };

            let value = match (native, wire) {
                (Some(_), Some(_)) => {
                    return Err(Error::DuplicateField {
                        model: self.name,
                        native: field.name,
                        wire: field.wire,
                    });
                }
                (Some(v), None) | (None, Some(v)) => v,
                (None, None) => Value::Null,
            };

            if value.is_null() {
                if field.required {
                    return Err(Error::MissingField {
                        model: self.name,
                        field: field.name,
                    });
                }
                continue;
            }

            let value = convert(self.name, field, &field.kind, value)?;
            output.insert(field.wire.to_string(), value);
        }

        for key in input.keys() {
            trace!(model = self.name, key = %key, "dropping unrecognized field");
        }

        Ok(output)
    }
}

fn convert(
    model: &'static str,
    field: &FieldSpec,
    kind: &FieldKind,
    value: Value,
) -> Result<Value> {
    let invalid = |expected| Error::InvalidField {
        model,
        field: field.name,
        expected,
    };

    match kind {
        FieldKind::String | FieldKind::Enum => match value {
            Value::String(_) => Ok(value),
            _ => Err(invalid("a string")),
        },
        FieldKind::Integer => {
            if value.is_i64() || value.is_u64() {
                Ok(value)
            } else {
                Err(invalid("an integer"))
            }
        }
        FieldKind::Boolean => match value {
            Value::Bool(_) => Ok(value),
            _ => Err(invalid("a boolean")),
        },
        FieldKind::Timestamp => {
            let parses = value
                .as_str()
                .is_some_and(|s| DateTime::parse_from_rfc3339(s).is_ok());
            if parses {
                Ok(value)
            } else {
                Err(invalid("an RFC 3339 timestamp"))
            }
        }
        FieldKind::Object(schema) => match value {
            Value::Object(map) => Ok(Value::Object(schema().normalize(map)?)),
            _ => Err(invalid("an object")),
        },
        FieldKind::Polymorphic => match value {
            Value::Object(_) => Ok(value),
            _ => Err(invalid("an object")),
        },
        FieldKind::List(inner) => match value {
            Value::Array(items) => items
                .into_iter()
                .map(|item| convert(model, field, inner, item))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            _ => Err(invalid("a list")),
        },
        FieldKind::Map(inner) => match value {
            Value::Object(entries) => entries
                .into_iter()
                .map(|(key, item)| Ok((key, convert(model, field, inner, item)?)))
                .collect::<Result<Map<String, Value>>>()
                .map(Value::Object),
            _ => Err(invalid("a map")),
        },
    }
}
