use api_fields::entity::{Entity, EntityType, TypeDescriptor};
use api_fields::store::MetadataStore;
use api_fields::Directive;
use serde_json::{Map, Value};

struct Parent;
struct Child;
struct Grandchild;
impl Entity for Parent {}
impl Entity for Child {
    fn parent() -> Option<EntityType> {
        Some(EntityType::of::<Parent>())
    }
}
impl Entity for Grandchild {
    fn parent() -> Option<EntityType> {
        Some(EntityType::of::<Child>())
    }
}

#[test]
fn undeclared_types_have_empty_entries() {
    let store = MetadataStore::new();
    assert!(store.lookup(EntityType::of::<Child>()).is_none());
    assert!(store.entry(EntityType::of::<Child>()).is_empty());
    assert!(store.is_empty());
}

#[test]
fn undeclared_child_sees_ancestor_entry() {
    let mut store = MetadataStore::new();
    store.register_field(EntityType::of::<Parent>(), "id", Directive::Included);
    let entry = store.entry(EntityType::of::<Grandchild>());
    assert!(matches!(entry.fields.get("id"), Some(Directive::Included)));
    assert_eq!(store.len(), 1);
}

#[test]
fn only_earlier_ancestor_declarations_are_inherited() {
    let mut store = MetadataStore::new();
    store.register_field(EntityType::of::<Parent>(), "a", Directive::Included);
    store.register_field(EntityType::of::<Child>(), "b", Directive::Included);
    store.register_field(EntityType::of::<Parent>(), "late", Directive::Included);
    let child = store.entry(EntityType::of::<Child>());
    assert!(child.fields.contains_key("a"));
    assert!(child.fields.contains_key("b"));
    assert!(!child.fields.contains_key("late"));
}

#[test]
fn side_tables_follow_the_same_discipline() {
    let mut store = MetadataStore::new();
    let mut fragment = Map::new();
    fragment.insert("format".into(), Value::from("email"));
    store.register_annotation(EntityType::of::<Parent>(), "mail", fragment);
    store.register_type_hint(EntityType::of::<Child>(), "mail", TypeDescriptor::String);
    let child = store.entry(EntityType::of::<Child>());
    assert_eq!(child.type_hints.get("mail"), Some(&TypeDescriptor::String));
    assert!(child.annotations.contains_key("mail"));
    assert!(child.fields.is_empty());
}
