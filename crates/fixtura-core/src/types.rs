use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Abstract sequence; mapped to [`VEC`] by default.
pub const COLLECTION: &str = "Collection";
/// Abstract ordered sequence; mapped to [`VEC`] by default.
pub const LIST: &str = "List";
/// Abstract unique set; mapped to [`HASH_SET`] by default.
pub const SET: &str = "Set";
/// Abstract key-value map; mapped to [`HASH_MAP`] by default.
pub const MAP: &str = "Map";

pub const VEC: &str = "Vec";
pub const VEC_DEQUE: &str = "VecDeque";
pub const HASH_SET: &str = "HashSet";
pub const BTREE_SET: &str = "BTreeSet";
pub const HASH_MAP: &str = "HashMap";
pub const BTREE_MAP: &str = "BTreeMap";

/// Name of a registered type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeKey(String);

impl TypeKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TypeKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&TypeKey> for TypeKey {
    fn from(value: &TypeKey) -> Self {
        value.clone()
    }
}

/// Scalar kinds with both a primitive and a nullable (boxed) form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scalar {
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Char,
}

impl Scalar {
    pub const ALL: [Scalar; 8] = [
        Scalar::Bool,
        Scalar::Byte,
        Scalar::Short,
        Scalar::Int,
        Scalar::Long,
        Scalar::Float,
        Scalar::Double,
        Scalar::Char,
    ];

    /// Value a primitive field holds before anything is assigned to it.
    pub fn zero(self) -> Value {
        match self {
            Scalar::Bool => Value::Bool(false),
            Scalar::Byte => Value::Byte(0),
            Scalar::Short => Value::Short(0),
            Scalar::Int => Value::Int(0),
            Scalar::Long => Value::Long(0),
            Scalar::Float => Value::Float(0.0),
            Scalar::Double => Value::Double(0.0),
            Scalar::Char => Value::Char('\0'),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Scalar::Bool => "bool",
            Scalar::Byte => "byte",
            Scalar::Short => "short",
            Scalar::Int => "int",
            Scalar::Long => "long",
            Scalar::Float => "float",
            Scalar::Double => "double",
            Scalar::Char => "char",
        }
    }
}

/// Declared type of a field, capability return, or generation request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeRef {
    /// Non-nullable scalar; holds its zero value until assigned.
    Primitive { scalar: Scalar },
    /// Nullable scalar.
    Boxed { scalar: Scalar },
    Text,
    Date,
    Uuid,
    Array { element: Box<TypeRef> },
    /// Container type; empty `args` means the element type is unknown.
    Container { container: TypeKey, args: Vec<TypeRef> },
    /// Record, interface, or enum registered in the type registry.
    Named { key: TypeKey },
    /// The type of a type. Never generated.
    Class,
}

impl TypeRef {
    pub fn primitive(scalar: Scalar) -> Self {
        TypeRef::Primitive { scalar }
    }

    pub fn boxed(scalar: Scalar) -> Self {
        TypeRef::Boxed { scalar }
    }

    pub fn named(key: impl Into<TypeKey>) -> Self {
        TypeRef::Named { key: key.into() }
    }

    pub fn array(element: TypeRef) -> Self {
        TypeRef::Array {
            element: Box::new(element),
        }
    }

    pub fn container(container: impl Into<TypeKey>, args: Vec<TypeRef>) -> Self {
        TypeRef::Container {
            container: container.into(),
            args,
        }
    }

    pub fn list(element: TypeRef) -> Self {
        Self::container(LIST, vec![element])
    }

    pub fn set(element: TypeRef) -> Self {
        Self::container(SET, vec![element])
    }

    pub fn map(key: TypeRef, value: TypeRef) -> Self {
        Self::container(MAP, vec![key, value])
    }

    /// Container reference without generic information.
    pub fn raw(container: impl Into<TypeKey>) -> Self {
        Self::container(container, Vec::new())
    }

    /// Primitive scalars become their boxed form; everything else is unchanged.
    pub fn normalized(&self) -> TypeRef {
        match self {
            TypeRef::Primitive { scalar } => TypeRef::Boxed { scalar: *scalar },
            other => other.clone(),
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeRef::Primitive { .. })
    }

    pub fn is_container(&self) -> bool {
        matches!(self, TypeRef::Container { .. })
    }

    pub fn named_key(&self) -> Option<&TypeKey> {
        match self {
            TypeRef::Named { key } => Some(key),
            _ => None,
        }
    }

    /// Value a field of this type holds right after construction.
    pub fn language_default(&self) -> Value {
        match self {
            TypeRef::Primitive { scalar } => scalar.zero(),
            _ => Value::Null,
        }
    }

    /// Whether a field declared with this type can hold `value`.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (TypeRef::Primitive { scalar }, value) => value.scalar() == Some(*scalar),
            (_, Value::Null) => true,
            (TypeRef::Boxed { scalar }, value) => value.scalar() == Some(*scalar),
            (TypeRef::Text, Value::Text(_)) => true,
            (TypeRef::Date, Value::Date(_)) => true,
            (TypeRef::Uuid, Value::Uuid(_)) => true,
            (TypeRef::Array { element }, Value::Array { element: actual, .. }) => {
                element.as_ref() == actual
            }
            (TypeRef::Container { .. }, Value::Container(_) | Value::StandIn(_)) => true,
            (
                TypeRef::Named { .. },
                Value::Object(_) | Value::Enum(_) | Value::StandIn(_) | Value::Container(_),
            ) => true,
            _ => false,
        }
    }
}

impl From<&str> for TypeRef {
    fn from(value: &str) -> Self {
        TypeRef::named(value)
    }
}

impl From<TypeKey> for TypeRef {
    fn from(key: TypeKey) -> Self {
        TypeRef::Named { key }
    }
}

impl From<&TypeKey> for TypeRef {
    fn from(key: &TypeKey) -> Self {
        TypeRef::Named { key: key.clone() }
    }
}

impl From<&TypeRef> for TypeRef {
    fn from(value: &TypeRef) -> Self {
        value.clone()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive { scalar } => f.write_str(scalar.name()),
            TypeRef::Boxed { scalar } => write!(f, "Option<{}>", scalar.name()),
            TypeRef::Text => f.write_str("text"),
            TypeRef::Date => f.write_str("date"),
            TypeRef::Uuid => f.write_str("uuid"),
            TypeRef::Array { element } => write!(f, "[{element}]"),
            TypeRef::Container { container, args } => {
                if args.is_empty() {
                    return write!(f, "{container}");
                }
                let args: Vec<String> = args.iter().map(ToString::to_string).collect();
                write!(f, "{container}<{}>", args.join(", "))
            }
            TypeRef::Named { key } => write!(f, "{key}"),
            TypeRef::Class => f.write_str("class"),
        }
    }
}
