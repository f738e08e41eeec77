// other keepers use HashMap, with entity types hashed by identity
use core::hash::BuildHasherDefault;
use seahash::SeaHasher;
use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value};

use crate::directive::Directive;
use crate::entity::{EntityType, TypeDescriptor};

pub type TypeHasher = BuildHasherDefault<SeaHasher>;

/// Everything declared for one entity type, inherited entries included.
#[derive(Clone, Debug, Default)]
pub struct MetadataEntry {
    pub fields: BTreeMap<String, Directive>,
    pub type_hints: BTreeMap<String, TypeDescriptor>,
    pub annotations: BTreeMap<String, Map<String, Value>>,
}

impl MetadataEntry {
    // own declarations win over inherited ones of the same name
    fn overlay(mut self, own: &MetadataEntry) -> Self {
        self.fields
            .extend(own.fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.type_hints
            .extend(own.type_hints.iter().map(|(k, v)| (k.clone(), *v)));
        self.annotations
            .extend(own.annotations.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.type_hints.is_empty() && self.annotations.is_empty()
    }
}

/// Keeps one [`MetadataEntry`] per entity type.
///
/// The own table holds only what a type declared itself. The merged table is
/// rebuilt from the parent's current entry on every declaration, so a child
/// only sees ancestor declarations that were issued before its own latest one.
#[derive(Debug, Default)]
pub struct MetadataStore {
    own: HashMap<EntityType, MetadataEntry, TypeHasher>,
    merged: HashMap<EntityType, MetadataEntry, TypeHasher>,
}

impl MetadataStore {
    pub fn new() -> Self {
        Self {
            own: HashMap::default(),
            merged: HashMap::default(),
        }
    }
    pub fn register_field(&mut self, ty: EntityType, name: &str, directive: Directive) {
        self.own_entry(ty).fields.insert(name.to_owned(), directive);
        self.rederive(ty);
    }
    pub fn register_type_hint(&mut self, ty: EntityType, name: &str, descriptor: TypeDescriptor) {
        self.own_entry(ty).type_hints.insert(name.to_owned(), descriptor);
        self.rederive(ty);
    }
    pub fn register_annotation(&mut self, ty: EntityType, name: &str, fragment: Map<String, Value>) {
        self.own_entry(ty).annotations.insert(name.to_owned(), fragment);
        self.rederive(ty);
    }
    /// The entry of `ty`, or of its nearest ancestor that declared anything.
    pub fn lookup(&self, ty: EntityType) -> Option<&MetadataEntry> {
        let mut current = Some(ty);
        while let Some(ty) = current {
            if let Some(entry) = self.merged.get(&ty) {
                return Some(entry);
            }
            current = ty.parent();
        }
        None
    }
    pub fn entry(&self, ty: EntityType) -> MetadataEntry {
        self.lookup(ty).cloned().unwrap_or_default()
    }
    /// Number of entity types that declared something themselves.
    pub fn len(&self) -> usize {
        self.own.len()
    }
    pub fn is_empty(&self) -> bool {
        self.own.is_empty()
    }
    fn own_entry(&mut self, ty: EntityType) -> &mut MetadataEntry {
        self.own.entry(ty).or_default()
    }
    fn rederive(&mut self, ty: EntityType) {
        let inherited = ty
            .parent()
            .map(|parent| self.entry(parent))
            .unwrap_or_default();
        let merged = match self.own.get(&ty) {
            Some(own) => inherited.overlay(own),
            None => inherited,
        };
        self.merged.insert(ty, merged);
    }
}
