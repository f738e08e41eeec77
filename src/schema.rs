//! Structural schema of an entity's exposed shape.
//!
//! The schema follows the resolved projection: only declared fields appear,
//! nested entities become nested object schemas, collections become `array`
//! schemas and fields cut off as cycles are left out. Primitive fields map
//! through [`TypeDescriptor::json_type`], and annotation fragments are merged
//! over whatever was computed.

use serde_json::{json, Map, Value};
use tracing::trace;

use crate::entity::{Entity, EntityType, TypeDescriptor};
use crate::merge::deep_merge;
use crate::registry::Registry;
use crate::resolve::{Metadata, Projection};

/// Input of [`Registry::build_schema`]: a type, or an array of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemaTarget {
    Single(EntityType),
    ArrayOf(EntityType),
}

impl From<EntityType> for SchemaTarget {
    fn from(ty: EntityType) -> Self {
        Self::Single(ty)
    }
}
// a one-element list means "array of"
impl From<[EntityType; 1]> for SchemaTarget {
    fn from([ty]: [EntityType; 1]) -> Self {
        Self::ArrayOf(ty)
    }
}

impl Registry {
    pub fn build_schema(&self, target: impl Into<SchemaTarget>) -> Value {
        match target.into() {
            SchemaTarget::ArrayOf(ty) => array_schema(self.build_schema(ty)),
            SchemaTarget::Single(ty) => {
                let resolution = self.resolve(ty);
                let metadata = resolution.metadata.unwrap_or_default();
                let empty = Projection::new();
                let projection = resolution.projection.as_object().unwrap_or(&empty);
                trace!(entity = %ty, fields = metadata.fields.len(), "build schema");
                object_schema(projection, &metadata)
            }
        }
    }
    pub fn schema_for<E: Entity>(&self) -> Value {
        self.build_schema(EntityType::of::<E>())
    }
    pub fn array_schema_for<E: Entity>(&self) -> Value {
        self.build_schema([EntityType::of::<E>()])
    }
}

fn array_schema(items: Value) -> Value {
    json!({
        "type": "array",
        "items": items,
    })
}

// builds from an already resolved projection, so cycle cuts are respected
fn object_schema(projection: &Projection, metadata: &Metadata) -> Value {
    let empty = Projection::new();
    let mut properties = Map::new();
    for (name, field) in &metadata.fields {
        let value = projection.get(name);
        let computed = if field.nested {
            let Some(inner) = field.inner.as_deref() else {
                continue;
            };
            let nested = nested_projection(value, field.array).unwrap_or(&empty);
            let schema = object_schema(nested, inner);
            Some(if field.array { array_schema(schema) } else { schema })
        } else if matches!(value, None | Some(Value::Bool(false))) {
            continue;
        } else {
            primitive_schema(&field.descriptor)
        };
        let property = match (computed, metadata.annotations.get(name)) {
            (Some(mut property), Some(annotation)) => {
                deep_merge(&mut property, Value::Object(annotation.clone()));
                Some(property)
            }
            (None, Some(annotation)) => Some(Value::Object(annotation.clone())),
            (computed, None) => computed,
        };
        if let Some(property) = property {
            properties.insert(name.clone(), property);
        }
    }
    json!({
        "type": "object",
        "additionalProperties": false,
        "properties": properties,
    })
}

fn primitive_schema(descriptor: &TypeDescriptor) -> Option<Value> {
    descriptor.json_type().map(|ty| json!({ "type": ty }))
}

fn nested_projection(value: Option<&Value>, array: bool) -> Option<&Projection> {
    let value = value?;
    if array {
        value.as_array()?.first()?.as_object()
    } else {
        value.as_object()
    }
}
