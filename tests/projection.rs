use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use api_fields::entity::EntityType;
use api_fields::{entity, Directive, Registry};
use serde_json::{json, Map, Value};

#[allow(dead_code)]
struct Other {
    property_a: bool,
    property_b: String,
}
#[allow(dead_code)]
struct Subject {
    property_a: bool,
    property_b: String,
    property_c: u32,
    other: Other,
    others: Vec<Other>,
    custom: Value,
}
entity!(Other { property_a: bool, property_b: String });
entity!(Subject { property_a: bool, property_b: String, property_c: u32, other: Other, others: Vec<Other>, custom: Value });

fn setup() -> Registry {
    let mut registry = Registry::new();
    registry.entity::<Other>().field("property_a");
    registry.entity::<Subject>().field("property_c");
    registry
}

#[test]
fn included_field_resolves_to_true() {
    let registry = setup();
    let resolution = registry.resolve_entity::<Subject>();
    assert_eq!(resolution.projection, json!({"property_c": true}));
    assert!(!resolution.is_cycle());
}

#[test]
fn undeclared_type_resolves_to_empty_projection() {
    let registry = Registry::new();
    assert_eq!(registry.resolve_entity::<Subject>().into_value(), json!({}));
}

#[test]
fn nested_single_expands_target() {
    let mut registry = setup();
    registry.entity::<Subject>().nested::<Other>("other");
    assert_eq!(
        registry.resolve_entity::<Subject>().into_value(),
        json!({"property_c": true, "other": {"property_a": true}})
    );
}

#[test]
fn nested_array_wraps_target_in_one_element_list() {
    let mut registry = setup();
    registry.entity::<Subject>().nested_array::<Other>("others");
    let resolution = registry.resolve_entity::<Subject>();
    assert_eq!(
        resolution.projection,
        json!({"property_c": true, "others": [{"property_a": true}]})
    );
    let metadata = resolution.metadata.expect("metadata");
    let others = &metadata.fields["others"];
    assert!(others.nested && others.array);
    assert!(others.inner.is_some(), "nested metadata should ride along");
}

#[test]
fn side_channel_is_not_part_of_the_projection() {
    let registry = setup();
    let resolution = registry.resolve_entity::<Subject>();
    let fields = resolution.fields().expect("object");
    assert_eq!(fields.len(), 1);
    let metadata = resolution.metadata.as_ref().expect("metadata");
    assert_eq!(
        metadata.fields["property_c"].descriptor,
        api_fields::entity::TypeDescriptor::Number
    );
}

#[test]
fn literal_is_returned_verbatim_every_time() {
    let mut registry = setup();
    registry
        .entity::<Subject>()
        .with("custom", json!({"baz": true}))
        .expect("literal directive");
    for _ in 0..2 {
        assert_eq!(
            registry.resolve_entity::<Subject>().into_value(),
            json!({"property_c": true, "custom": {"baz": true}})
        );
    }
}

#[test]
fn lazy_producer_runs_on_every_resolution() {
    let flag = Arc::new(AtomicBool::new(true));
    let captured = Arc::clone(&flag);
    let mut registry = setup();
    registry.declare_directive(
        EntityType::of::<Subject>(),
        "custom",
        Directive::lazy(move || {
            let mut picked = Map::new();
            picked.insert("bar".into(), Value::Bool(captured.load(Ordering::SeqCst)));
            picked
        }),
    );
    let first = registry.resolve_entity::<Subject>().into_value();
    assert_eq!(first["custom"], json!({"bar": true}));
    flag.store(false, Ordering::SeqCst);
    let second = registry.resolve_entity::<Subject>().into_value();
    assert_eq!(second["custom"], json!({"bar": false}));
}

#[test]
fn shared_producer_yields_one_value_per_resolution() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let shared = Directive::lazy(move || {
        let mut picked = Map::new();
        picked.insert("call".into(), Value::from(counter.fetch_add(1, Ordering::SeqCst)));
        picked
    });
    let mut registry = setup();
    let subject = EntityType::of::<Subject>();
    registry
        .declare_directive(subject, "custom", shared.clone())
        .declare_directive(subject, "property_b", shared);
    let first = registry.resolve(subject).into_value();
    assert_eq!(first["custom"], json!({"call": 0}));
    assert_eq!(first["custom"], first["property_b"], "one call, one value");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let second = registry.resolve(subject).into_value();
    assert_eq!(second["custom"], json!({"call": 1}));
    assert_eq!(second["custom"], second["property_b"]);
}

#[test]
fn lazy_producer_may_project_another_registry() {
    let other = Arc::new(setup());
    let mut registry = Registry::new();
    let source = Arc::clone(&other);
    registry.declare_directive(
        EntityType::of::<Subject>(),
        "custom",
        Directive::lazy(move || {
            source
                .resolve_entity::<Other>()
                .fields()
                .cloned()
                .unwrap_or_default()
        }),
    );
    assert_eq!(
        registry.resolve_entity::<Subject>().into_value(),
        json!({"custom": {"property_a": true}})
    );
}

#[test]
fn overrides_replace_flags() {
    let mut registry = setup();
    registry.entity::<Subject>().field("property_a");
    let mut overrides = Map::new();
    overrides.insert("property_a".into(), Value::Bool(false));
    let resolution = registry.resolve_with(Some(EntityType::of::<Subject>()), Some(overrides));
    assert_eq!(
        resolution.into_value(),
        json!({"property_a": false, "property_c": true})
    );
}

#[test]
fn overrides_deep_merge_nested_objects() {
    let mut registry = setup();
    registry
        .entity::<Subject>()
        .nested::<Other>("other")
        .nested_array::<Other>("others");
    let overrides = json!({
        "other": {"property_b": true},
        "others": [false],
        "extra": {"x": true},
    });
    let overrides = overrides.as_object().cloned().expect("object");
    let resolution = registry.resolve_with(Some(EntityType::of::<Subject>()), Some(overrides));
    assert_eq!(
        resolution.into_value(),
        json!({
            "property_c": true,
            "other": {"property_a": true, "property_b": true},
            "others": [false],
            "extra": {"x": true},
        })
    );
}

#[test]
fn absent_type_returns_overrides() {
    let registry = setup();
    assert_eq!(registry.resolve_with(None, None).into_value(), json!({}));
    let mut overrides = Map::new();
    overrides.insert("only".into(), Value::Bool(true));
    assert_eq!(
        registry.resolve_with(None, Some(overrides)).into_value(),
        json!({"only": true})
    );
}

#[test]
fn instances_resolve_by_their_type() {
    let registry = setup();
    let instance = Other {
        property_a: true,
        property_b: "default".into(),
    };
    assert_eq!(
        registry.resolve_value(&instance).into_value(),
        json!({"property_a": true})
    );
}
