// used to key entity types by identity rather than by shape
use std::any::{type_name, TypeId};
// used to print out readable forms of an entity type
use std::fmt;
// used to indicate that entity types are hashable by identity
use std::hash::{Hash, Hasher};

// date and time types are described as dates
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

/// A data-model type whose exposed shape is governed by a [`crate::Registry`].
///
/// Both methods have defaults, so a type without a parent and without
/// introspectable fields only needs an empty impl. The [`crate::entity!`]
/// macro writes the impl from a field list.
pub trait Entity: 'static {
    /// The type this one inherits declarations from.
    fn parent() -> Option<EntityType> {
        None
    }
    /// The declared type of `field`, as far as it can be told.
    fn declared_type(_field: &str) -> TypeDescriptor {
        TypeDescriptor::Unknown
    }
}

/// Identity handle of an [`Entity`] type.
///
/// Equality and hashing only look at the `TypeId`; the remaining members are
/// captured so the registry can walk inheritance and ask for declared types
/// without being generic over the entity.
#[derive(Clone, Copy)]
pub struct EntityType {
    id: TypeId,
    name: &'static str,
    parent: fn() -> Option<EntityType>,
    declared_type: fn(&str) -> TypeDescriptor,
}

impl EntityType {
    pub fn of<E: Entity>() -> Self {
        Self {
            id: TypeId::of::<E>(),
            name: type_name::<E>(),
            parent: E::parent,
            declared_type: E::declared_type,
        }
    }
    pub fn of_val<E: Entity>(_instance: &E) -> Self {
        Self::of::<E>()
    }
    /// Fully qualified type name.
    pub fn name(&self) -> &'static str {
        self.name
    }
    /// Type name without its module path.
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit("::").next().unwrap_or(self.name)
    }
    pub fn parent(&self) -> Option<EntityType> {
        (self.parent)()
    }
    /// Asks the type, then its ancestors, for the declared type of `field`.
    pub fn declared_type(&self, field: &str) -> TypeDescriptor {
        let mut current = Some(*self);
        while let Some(ty) = current {
            match (ty.declared_type)(field) {
                TypeDescriptor::Unknown => current = ty.parent(),
                known => return known,
            }
        }
        TypeDescriptor::Unknown
    }
}
impl PartialEq for EntityType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for EntityType {}
impl Hash for EntityType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
impl fmt::Debug for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "EntityType({})", self.name)
    }
}
impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

/// Declared type of a field, as reported by [`Entity::declared_type`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TypeDescriptor {
    Number,
    Boolean,
    String,
    Date,
    Entity(EntityType),
    #[default]
    Unknown,
}

impl TypeDescriptor {
    pub fn of<T: Describe + ?Sized>() -> Self {
        T::descriptor()
    }
    pub fn entity<E: Entity>() -> Self {
        Self::Entity(EntityType::of::<E>())
    }
    /// The primitive JSON schema type this descriptor maps onto, if any.
    pub fn json_type(&self) -> Option<&'static str> {
        match self {
            Self::Number => Some("number"),
            Self::Boolean => Some("boolean"),
            Self::String | Self::Date => Some("string"),
            Self::Entity(_) | Self::Unknown => None,
        }
    }
}
impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Number => write!(f, "Number"),
            Self::Boolean => write!(f, "Boolean"),
            Self::String => write!(f, "String"),
            Self::Date => write!(f, "Date"),
            Self::Entity(ty) => write!(f, "{}", ty),
            Self::Unknown => write!(f, "?"),
        }
    }
}

/// Reports the [`TypeDescriptor`] of a Rust field type.
pub trait Describe {
    fn descriptor() -> TypeDescriptor;
}

macro_rules! describe_as {
    ($descriptor:ident: $($t:ty),+) => {
        $(
            impl Describe for $t {
                fn descriptor() -> TypeDescriptor {
                    TypeDescriptor::$descriptor
                }
            }
        )+
    };
}

// ------------- Field Types --------------
describe_as!(Number: i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);
describe_as!(Boolean: bool);
describe_as!(String: String, str, char);
describe_as!(Date: NaiveDate, NaiveDateTime, NaiveTime);
// collections and free-form values have no primitive mapping
describe_as!(Unknown: serde_json::Value, serde_json::Map<String, serde_json::Value>);

impl<Tz: TimeZone> Describe for DateTime<Tz> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Date
    }
}
impl<T: Describe + ?Sized> Describe for &T {
    fn descriptor() -> TypeDescriptor {
        T::descriptor()
    }
}
impl<T: Describe + ?Sized> Describe for Box<T> {
    fn descriptor() -> TypeDescriptor {
        T::descriptor()
    }
}
impl<T: Describe> Describe for Option<T> {
    fn descriptor() -> TypeDescriptor {
        T::descriptor()
    }
}
impl<T> Describe for Vec<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Unknown
    }
}

/// Implements [`Entity`] (and [`Describe`]) for a struct from its field list.
///
/// ```
/// use api_fields::entity;
/// use api_fields::entity::{EntityType, TypeDescriptor};
///
/// struct Animal { name: String }
/// struct Dog { name: String, good: bool }
/// entity!(Animal { name: String });
/// entity!(Dog: Animal { good: bool });
///
/// let dog = EntityType::of::<Dog>();
/// assert_eq!(dog.declared_type("good"), TypeDescriptor::Boolean);
/// assert_eq!(dog.declared_type("name"), TypeDescriptor::String);
/// ```
#[macro_export]
macro_rules! entity {
    ($ty:ident $(: $parent:ident)? { $($field:ident : $fty:ty),* $(,)? }) => {
        impl $crate::entity::Entity for $ty {
            $(
                fn parent() -> ::core::option::Option<$crate::entity::EntityType> {
                    ::core::option::Option::Some($crate::entity::EntityType::of::<$parent>())
                }
            )?
            fn declared_type(field: &str) -> $crate::entity::TypeDescriptor {
                match field {
                    $(stringify!($field) => <$fty as $crate::entity::Describe>::descriptor(),)*
                    _ => $crate::entity::TypeDescriptor::Unknown,
                }
            }
        }
        impl $crate::entity::Describe for $ty {
            fn descriptor() -> $crate::entity::TypeDescriptor {
                $crate::entity::TypeDescriptor::entity::<$ty>()
            }
        }
    };
}
