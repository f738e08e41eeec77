//! api-fields – declare the public projection of data-model types.
//!
//! An application declares, per entity type, which fields make up what it
//! exposes (e.g. in an API response). From those declarations two artifacts
//! are derived:
//! * a resolved [`resolve::Projection`], a pick-spec telling an extractor
//!   which fields to copy off a live instance and how to descend into nested
//!   entities and collections;
//! * a JSON-Schema-like description of the exposed shape.
//!
//! ## Modules
//! * [`entity`] – The [`entity::Entity`] trait, identity handles
//!   ([`entity::EntityType`]) and declared field types
//!   ([`entity::TypeDescriptor`]), plus the [`entity!`] macro.
//! * [`directive`] – The closed set of field [`directive::Directive`]s.
//! * [`store`] – The inheritance-aware [`store::MetadataStore`].
//! * [`registry`] – The [`Registry`] and its declaration API.
//! * [`resolve`] – Recursive resolution with cycle detection and overrides.
//! * [`schema`] – Schema derivation from resolved projections.
//! * [`merge`] – Deep merge of plain JSON structures.
//!
//! ## Inheritance
//! An entity names its parent through [`entity::Entity::parent`]. Every
//! declaration recomputes the type's entry as the parent's entry overlaid by
//! the type's own declarations, so a child can re-declare (or exclude) an
//! inherited field while keeping the rest.
//!
//! ## Cycles
//! Nested directives are resolved lazily and recursively. A type met again on
//! the same recursion path resolves to `false`, which both stops expansion and
//! keeps the field out of the schema.
//!
//! ## Quick Start
//! ```
//! use api_fields::{entity, Registry};
//! use api_fields::entity::EntityType;
//! use serde_json::json;
//!
//! struct Author { name: String, password: String }
//! struct Book { title: String, pages: u32, author: Author }
//! entity!(Author { name: String, password: String });
//! entity!(Book { title: String, pages: u32, author: Author });
//!
//! let mut registry = Registry::new();
//! registry.entity::<Author>().field("name");
//! registry.entity::<Book>().field("title").field("pages").nested::<Author>("author");
//!
//! let book = EntityType::of::<Book>();
//! assert_eq!(
//!     registry.resolve(book).into_value(),
//!     json!({"title": true, "pages": true, "author": {"name": true}})
//! );
//! assert_eq!(
//!     registry.build_schema(book)["properties"]["pages"],
//!     json!({"type": "number"})
//! );
//! ```

pub mod directive;
pub mod entity;
pub mod error;
pub mod merge;
pub mod registry;
pub mod resolve;
pub mod schema;
pub mod store;

pub use directive::Directive;
pub use error::{ApiFieldsError, Result};
pub use registry::Registry;
pub use resolve::{Projection, Resolution};
pub use schema::SchemaTarget;
