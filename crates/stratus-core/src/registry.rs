//! Discriminator registries for polymorphic model families.
//!
//! A family (for example build pipeline stages) is decoded by reading its
//! discriminator field once, picking the matching [`Variant`], normalizing the
//! payload against that variant's schema and calling its factory. Payloads with
//! a missing or unrecognized discriminator fall back to the family's base type.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::schema::SchemaRef;
use crate::{Error, Result};

/// One concrete subtype of a family.
pub struct Variant<T> {
    /// Discriminator value selecting this subtype.
    pub tag: &'static str,
    pub schema: SchemaRef,
    /// Factory receiving the normalized, wire-keyed payload.
    pub build: fn(Value) -> Result<T>,
}

/// Discriminator value to subtype table of one family.
pub struct Registry<T: 'static> {
    /// Name of the family's base type.
    pub family: &'static str,
    /// Native name of the discriminator field.
    pub discriminator: &'static str,
    /// Wire key of the discriminator field.
    pub discriminator_wire: &'static str,
    /// Used when the discriminator is missing or unrecognized.
    pub fallback: Variant<T>,
    pub variants: &'static [Variant<T>],
}

impl<T> Registry<T> {
    /// Read the discriminator under either spelling.
    pub fn discriminator_value<'a>(&self, payload: &'a Map<String, Value>) -> Result<Option<&'a str>> {
        let native = payload.get(self.discriminator);
        let wire = if self.discriminator_wire == self.discriminator {
            None
        } else {
            payload.get(self.discriminator_wire)
        };

        match (native, wire) {
            (Some(_), Some(_)) => Err(Error::DuplicateField {
                model: self.family,
                native: self.discriminator,
                wire: self.discriminator_wire,
            }),
            (Some(value), None) | (None, Some(value)) => Ok(value.as_str()),
            (None, None) => Ok(None),
        }
    }

    /// Pick the variant a payload decodes to.
    pub fn resolve(&self, payload: &Map<String, Value>) -> Result<&Variant<T>> {
        let tag = self.discriminator_value(payload)?;
        let variant = tag
            .and_then(|tag| self.variants.iter().find(|v| v.tag == tag))
            .unwrap_or(&self.fallback);
        Ok(variant)
    }

    /// Name of the concrete type a payload decodes to.
    pub fn type_name(&self, payload: &Map<String, Value>) -> Result<&'static str> {
        Ok((self.resolve(payload)?.schema)().name)
    }

    /// All registered discriminator values.
    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.variants.iter().map(|v| v.tag)
    }

    pub fn decode(&self, value: Value) -> Result<T> {
        let Value::Object(map) = value else {
            return Err(Error::NotAnObject { model: self.family });
        };

        let variant = self.resolve(&map)?;
        if std::ptr::eq(variant, &self.fallback) {
            debug!(
                family = self.family,
                discriminator = ?self.discriminator_value(&map)?,
                "no registered subtype, decoding as base type"
            );
        }

        let normalized = (variant.schema)().normalize(map)?;
        (variant.build)(Value::Object(normalized))
    }

    /// Encode one subtype, stamping its discriminator value.
    pub fn encode<S: Serialize>(&self, tag: &str, inner: &S) -> Result<Value> {
        let mut value = serde_json::to_value(inner)?;
        match &mut value {
            Value::Object(map) => {
                map.insert(
                    self.discriminator_wire.to_string(),
                    Value::String(tag.to_string()),
                );
                Ok(value)
            }
            _ => Err(Error::NotAnObject { model: self.family }),
        }
    }
}

/// Implement `Serialize`/`Deserialize` for a polymorphic family through its
/// `Model` implementation, so family values can nest inside other models.
macro_rules! polymorphic_serde {
    ($name:ty) => {
        impl ::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: ::serde::Serializer,
            {
                use ::serde::ser::Error as _;
                let value = $crate::model::Model::to_value(self).map_err(S::Error::custom)?;
                ::serde::Serialize::serialize(&value, serializer)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                use ::serde::de::Error as _;
                let value = <::serde_json::Value as ::serde::Deserialize>::deserialize(deserializer)?;
                <$name as $crate::model::Model>::from_value(value).map_err(D::Error::custom)
            }
        }
    };
}

pub(crate) use polymorphic_serde;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldKind, FieldSpec, ModelSchema};
    use serde_json::json;

    #[derive(Debug, PartialEq)]
    enum Shape {
        Circle(i64),
        Other(String),
    }

    fn base() -> &'static ModelSchema {
        static SCHEMA: ModelSchema = ModelSchema {
            name: "Shape",
            parent: None,
            fields: &[FieldSpec::required("shape_type", "shapeType", FieldKind::Enum)],
        };
        &SCHEMA
    }

    fn circle() -> &'static ModelSchema {
        static SCHEMA: ModelSchema = ModelSchema {
            name: "Circle",
            parent: Some(base),
            fields: &[FieldSpec::required("radius", "radius", FieldKind::Integer)],
        };
        &SCHEMA
    }

    fn build_circle(value: Value) -> Result<Shape> {
        Ok(Shape::Circle(value["radius"].as_i64().unwrap_or_default()))
    }

    fn build_other(value: Value) -> Result<Shape> {
        Ok(Shape::Other(value["shapeType"].as_str().unwrap_or_default().to_string()))
    }

    static REGISTRY: Registry<Shape> = Registry {
        family: "Shape",
        discriminator: "shape_type",
        discriminator_wire: "shapeType",
        fallback: Variant {
            tag: "",
            schema: base,
            build: build_other,
        },
        variants: &[Variant {
            tag: "CIRCLE",
            schema: circle,
            build: build_circle,
        }],
    };

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_resolve_registered_tag() {
        let payload = object(json!({"shapeType": "CIRCLE", "radius": 2}));
        assert_eq!(REGISTRY.type_name(&payload).unwrap(), "Circle");
        assert_eq!(REGISTRY.decode(Value::Object(payload)).unwrap(), Shape::Circle(2));
    }

    #[test]
    fn test_native_discriminator_spelling() {
        let shape = REGISTRY
            .decode(json!({"shape_type": "CIRCLE", "radius": 5}))
            .unwrap();
        assert_eq!(shape, Shape::Circle(5));
    }

    #[test]
    fn test_unknown_tag_falls_back_to_base() {
        let payload = object(json!({"shapeType": "HEXAGON"}));
        assert_eq!(REGISTRY.type_name(&payload).unwrap(), "Shape");
        assert_eq!(
            REGISTRY.decode(Value::Object(payload)).unwrap(),
            Shape::Other("HEXAGON".to_string())
        );
    }

    #[test]
    fn test_both_discriminator_spellings_rejected() {
        let err = REGISTRY
            .decode(json!({"shapeType": "CIRCLE", "shape_type": "CIRCLE", "radius": 1}))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateField { .. }));
    }

    #[test]
    fn test_encode_stamps_tag() {
        let value = REGISTRY.encode("CIRCLE", &json!({"radius": 1})).unwrap();
        assert_eq!(value, json!({"shapeType": "CIRCLE", "radius": 1}));
        assert_eq!(REGISTRY.tags().collect::<Vec<_>>(), vec!["CIRCLE"]);
    }
}
