use serde_json::Value;
use tracing::{debug, warn};

use crate::directive::{Directive, IntoDirective};
use crate::entity::{Entity, EntityType};
use crate::error::{ApiFieldsError, Result};
use crate::store::{MetadataEntry, MetadataStore};

/// Declarations of exposed fields for a set of entity types.
///
/// A registry is populated once, through the `declare*` methods, and read
/// through [`Registry::resolve`] and [`Registry::build_schema`] afterwards.
/// Registries are independent values, so tests and applications can keep
/// as many as they like side by side.
#[derive(Debug, Default)]
pub struct Registry {
    store: MetadataStore,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            store: MetadataStore::new(),
        }
    }
    pub fn store(&self) -> &MetadataStore {
        &self.store
    }
    pub fn entry(&self, ty: EntityType) -> MetadataEntry {
        self.store.entry(ty)
    }

    /// Declares `name` as an included field of `ty`.
    pub fn declare(&mut self, ty: EntityType, name: &str) -> &mut Self {
        self.declare_directive(ty, name, Directive::Included)
    }

    /// Declares `name` on `ty` from any accepted directive shape.
    ///
    /// Fails with [`ApiFieldsError::Configuration`] when the value is neither
    /// a boolean nor a literal object (or one of the typed directives).
    pub fn declare_field<D: IntoDirective>(
        &mut self,
        ty: EntityType,
        name: &str,
        directive: D,
    ) -> Result<&mut Self> {
        match directive.into_directive() {
            Ok(directive) => Ok(self.declare_directive(ty, name, directive)),
            Err(shape) => {
                warn!(entity = %ty, field = name, shape, "unsupported directive");
                Err(ApiFieldsError::configuration(
                    ty.name(),
                    name,
                    format!("unsupported directive shape: {shape}"),
                ))
            }
        }
    }

    pub fn declare_directive(&mut self, ty: EntityType, name: &str, directive: Directive) -> &mut Self {
        let descriptor = ty.declared_type(name);
        debug!(entity = %ty, field = name, kind = directive.kind(), %descriptor, "declare field");
        self.store.register_field(ty, name, directive);
        self.store.register_type_hint(ty, name, descriptor);
        self
    }

    /// Attaches an extra schema fragment to `name` on `ty`.
    ///
    /// The fragment is merged over the computed schema of the field, so its
    /// keys win, `type` included. Only JSON objects are accepted.
    pub fn declare_annotation(&mut self, ty: EntityType, name: &str, fragment: Value) -> Result<&mut Self> {
        match fragment {
            Value::Object(fragment) => {
                debug!(entity = %ty, field = name, keys = fragment.len(), "declare annotation");
                self.store.register_annotation(ty, name, fragment);
                Ok(self)
            }
            other => {
                warn!(entity = %ty, field = name, "annotation is not an object");
                Err(ApiFieldsError::configuration(
                    ty.name(),
                    name,
                    format!("annotation must be an object, found {other}"),
                ))
            }
        }
    }

    /// Scoped declarations for one entity type.
    pub fn entity<E: Entity>(&mut self) -> Declarations<'_> {
        Declarations {
            registry: self,
            ty: EntityType::of::<E>(),
        }
    }
}

/// Declaration builder returned by [`Registry::entity`].
pub struct Declarations<'r> {
    registry: &'r mut Registry,
    ty: EntityType,
}

impl Declarations<'_> {
    pub fn field(&mut self, name: &str) -> &mut Self {
        self.registry.declare(self.ty, name);
        self
    }
    pub fn exclude(&mut self, name: &str) -> &mut Self {
        self.registry.declare_directive(self.ty, name, Directive::Excluded);
        self
    }
    pub fn nested<E: Entity>(&mut self, name: &str) -> &mut Self {
        self.registry.declare_directive(self.ty, name, Directive::nested::<E>());
        self
    }
    pub fn nested_array<E: Entity>(&mut self, name: &str) -> &mut Self {
        self.registry
            .declare_directive(self.ty, name, Directive::nested_array::<E>());
        self
    }
    pub fn with<D: IntoDirective>(&mut self, name: &str, directive: D) -> Result<&mut Self> {
        self.registry.declare_field(self.ty, name, directive)?;
        Ok(self)
    }
    pub fn annotate(&mut self, name: &str, fragment: Value) -> Result<&mut Self> {
        self.registry.declare_annotation(self.ty, name, fragment)?;
        Ok(self)
    }
}
