use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::trace;

use crate::directive::Directive;
use crate::entity::{Entity, EntityType, TypeDescriptor};
use crate::merge::deep_merge;
use crate::registry::Registry;
use crate::store::TypeHasher;

/// Resolved pick-spec of an entity: field name to `true`, `false`, a nested
/// projection, a one-element list wrapping a nested projection, or a literal.
pub type Projection = Map<String, Value>;

// entity types being expanded along the current recursion path
type Visited = HashSet<EntityType, TypeHasher>;
// sub-projections returned by each lazy producer during one resolution
type Produced = HashMap<usize, Map<String, Value>, TypeHasher>;

/// What the resolver knows about one field beyond its projected value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldMeta {
    pub descriptor: TypeDescriptor,
    pub nested: bool,
    pub array: bool,
    /// Metadata of the nested projection, absent when the field hit a cycle.
    pub inner: Option<Box<Metadata>>,
}

/// Side-channel of a [`Projection`], kept apart from the projection itself.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Metadata {
    pub fields: BTreeMap<String, FieldMeta>,
    pub annotations: BTreeMap<String, Map<String, Value>>,
}

/// Output of the resolver.
///
/// `projection` is a plain JSON object, or `false` when the type was cut off
/// as a cycle; in that case there is no `metadata` either.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution {
    pub projection: Value,
    pub metadata: Option<Metadata>,
}

impl Resolution {
    fn cycle() -> Self {
        Self {
            projection: Value::Bool(false),
            metadata: None,
        }
    }
    fn plain(projection: Projection) -> Self {
        Self {
            projection: Value::Object(projection),
            metadata: Some(Metadata::default()),
        }
    }
    pub fn is_cycle(&self) -> bool {
        self.metadata.is_none()
    }
    pub fn fields(&self) -> Option<&Projection> {
        self.projection.as_object()
    }
    pub fn into_value(self) -> Value {
        self.projection
    }
}

impl Registry {
    /// Resolves the projection of `ty`.
    pub fn resolve(&self, ty: EntityType) -> Resolution {
        self.resolve_with(Some(ty), None)
    }
    pub fn resolve_entity<E: Entity>(&self) -> Resolution {
        self.resolve(EntityType::of::<E>())
    }
    /// Resolves the projection of the type of `instance`.
    pub fn resolve_value<E: Entity>(&self, instance: &E) -> Resolution {
        self.resolve(EntityType::of_val(instance))
    }
    /// Resolves `ty` and merges `overrides` on top.
    ///
    /// Objects present on both sides merge recursively; any other override
    /// value replaces the resolved one. Without a type the overrides alone are
    /// returned.
    ///
    /// Every lazy producer runs at most once per call; fields sharing a
    /// producer see the same sub-projection.
    pub fn resolve_with(&self, ty: Option<EntityType>, overrides: Option<Projection>) -> Resolution {
        match ty {
            Some(ty) => self.expand(ty, overrides, &Visited::default(), &mut Produced::default()),
            None => Resolution::plain(overrides.unwrap_or_default()),
        }
    }

    fn expand(
        &self,
        ty: EntityType,
        overrides: Option<Projection>,
        visited: &Visited,
        produced: &mut Produced,
    ) -> Resolution {
        if visited.contains(&ty) {
            trace!(entity = %ty, depth = visited.len(), "cycle cut");
            return Resolution::cycle();
        }
        let mut path = visited.clone();
        path.insert(ty);

        let mut projection = Projection::new();
        let mut metadata = Metadata::default();
        if let Some(entry) = self.store().lookup(ty) {
            trace!(entity = %ty, fields = entry.fields.len(), "expand");
            for (name, directive) in &entry.fields {
                let descriptor = entry.type_hints.get(name).copied().unwrap_or_default();
                let (value, meta) = match directive {
                    Directive::Included => (Value::Bool(true), FieldMeta::plain(descriptor)),
                    Directive::Excluded => (Value::Bool(false), FieldMeta::plain(descriptor)),
                    Directive::Literal(literal) => {
                        (Value::Object(literal.clone()), FieldMeta::plain(descriptor))
                    }
                    Directive::Lazy(producer) => {
                        let key = Arc::as_ptr(producer) as *const () as usize;
                        let picked = produced.entry(key).or_insert_with(|| producer()).clone();
                        (Value::Object(picked), FieldMeta::plain(descriptor))
                    }
                    Directive::NestedSingle(resolver) => {
                        let target = resolver();
                        let nested = self.expand(target, None, &path, produced);
                        (nested.projection, FieldMeta::nested(target, false, nested.metadata))
                    }
                    Directive::NestedArray(resolver) => {
                        let [target] = resolver();
                        let nested = self.expand(target, None, &path, produced);
                        (
                            Value::Array(vec![nested.projection]),
                            FieldMeta::nested(target, true, nested.metadata),
                        )
                    }
                };
                projection.insert(name.clone(), value);
                metadata.fields.insert(name.clone(), meta);
            }
            metadata.annotations = entry.annotations.clone();
        }

        let mut projection = Value::Object(projection);
        if let Some(overrides) = overrides {
            deep_merge(&mut projection, Value::Object(overrides));
        }
        Resolution {
            projection,
            metadata: Some(metadata),
        }
    }
}

impl FieldMeta {
    fn plain(descriptor: TypeDescriptor) -> Self {
        Self {
            descriptor,
            ..Self::default()
        }
    }
    fn nested(target: EntityType, array: bool, inner: Option<Metadata>) -> Self {
        Self {
            descriptor: TypeDescriptor::Entity(target),
            nested: true,
            array,
            inner: inner.map(Box::new),
        }
    }
}
