use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::entity::{Entity, EntityType};

/// Produces a sub-projection each time a field is resolved.
pub type Producer = Arc<dyn Fn() -> Map<String, Value> + Send + Sync>;

/// The declared rule for one field.
#[derive(Clone)]
pub enum Directive {
    /// Expose the field verbatim.
    Included,
    /// Suppress the field, even when a parent includes it.
    Excluded,
    /// Expose this fixed sub-projection, e.g. to pick keys off a plain object.
    Literal(Map<String, Value>),
    /// Expose whatever the producer returns, asked again on every resolution.
    Lazy(Producer),
    /// The field holds one related entity.
    NestedSingle(fn() -> EntityType),
    /// The field holds a collection of one related entity type.
    NestedArray(fn() -> [EntityType; 1]),
}

fn wrap<E: Entity>() -> [EntityType; 1] {
    [EntityType::of::<E>()]
}

impl Directive {
    pub fn lazy<F>(producer: F) -> Self
    where
        F: Fn() -> Map<String, Value> + Send + Sync + 'static,
    {
        Self::Lazy(Arc::new(producer))
    }
    pub fn nested<E: Entity>() -> Self {
        Self::NestedSingle(EntityType::of::<E>)
    }
    pub fn nested_array<E: Entity>() -> Self {
        Self::NestedArray(wrap::<E>)
    }
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Included => "included",
            Self::Excluded => "excluded",
            Self::Literal(_) => "literal",
            Self::Lazy(_) => "lazy",
            Self::NestedSingle(_) => "nested",
            Self::NestedArray(_) => "nested array",
        }
    }
}
impl fmt::Debug for Directive {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Included => write!(f, "Included"),
            Self::Excluded => write!(f, "Excluded"),
            Self::Literal(literal) => write!(f, "Literal({})", Value::Object(literal.clone())),
            Self::Lazy(_) => write!(f, "Lazy(..)"),
            Self::NestedSingle(resolver) => write!(f, "NestedSingle({:?})", resolver()),
            Self::NestedArray(resolver) => write!(f, "NestedArray({:?})", resolver()),
        }
    }
}

/// Values accepted where a field directive is declared.
///
/// Typed values always convert. Dynamic JSON is shape-checked and the name of
/// an unsupported shape comes back as the error.
pub trait IntoDirective {
    fn into_directive(self) -> Result<Directive, &'static str>;
}

impl IntoDirective for Directive {
    fn into_directive(self) -> Result<Directive, &'static str> {
        Ok(self)
    }
}
impl IntoDirective for bool {
    fn into_directive(self) -> Result<Directive, &'static str> {
        Ok(if self { Directive::Included } else { Directive::Excluded })
    }
}
impl IntoDirective for Map<String, Value> {
    fn into_directive(self) -> Result<Directive, &'static str> {
        Ok(Directive::Literal(self))
    }
}
impl IntoDirective for Value {
    fn into_directive(self) -> Result<Directive, &'static str> {
        match self {
            Value::Bool(flag) => flag.into_directive(),
            Value::Object(literal) => Ok(Directive::Literal(literal)),
            Value::Null => Err("null"),
            Value::Number(_) => Err("number"),
            Value::String(_) => Err("string"),
            Value::Array(_) => Err("array"),
        }
    }
}
// an omitted directive means the field is included
impl<D: IntoDirective> IntoDirective for Option<D> {
    fn into_directive(self) -> Result<Directive, &'static str> {
        match self {
            Some(directive) => directive.into_directive(),
            None => Ok(Directive::Included),
        }
    }
}
