use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::types::{Scalar, TypeKey, TypeRef};
use crate::value::Instance;

/// A declared field of a record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub type_ref: TypeRef,
    /// Record type that declares this field.
    pub declaring_type: TypeKey,
    /// Transient fields are never written by the generator.
    #[serde(default)]
    pub transient: bool,
    /// Read-only after construction. Only container contents are touched.
    #[serde(default)]
    pub immutable: bool,
}

impl FieldDescriptor {
    pub fn new(
        declaring_type: impl Into<TypeKey>,
        name: impl Into<String>,
        type_ref: impl Into<TypeRef>,
    ) -> Self {
        Self {
            name: name.into(),
            type_ref: type_ref.into(),
            declaring_type: declaring_type.into(),
            transient: false,
            immutable: false,
        }
    }
}

/// Post-construction hook run on a freshly allocated instance.
pub type ConstructFn = Arc<dyn Fn(&Instance) -> Result<(), String> + Send + Sync>;

/// How a record type is constructed.
#[derive(Clone, Default)]
pub enum Constructor {
    /// Fields start at their language defaults.
    #[default]
    Default,
    /// Fields start at their language defaults, then the hook runs.
    Custom(ConstructFn),
    /// The type has no zero-argument constructor.
    Unavailable,
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constructor::Default => f.write_str("Default"),
            Constructor::Custom(_) => f.write_str("Custom(..)"),
            Constructor::Unavailable => f.write_str("Unavailable"),
        }
    }
}

/// A concrete, constructible record type.
#[derive(Debug, Clone)]
pub struct RecordDescriptor {
    pub key: TypeKey,
    pub parent: Option<TypeKey>,
    pub fields: Vec<FieldDescriptor>,
    pub constructor: Constructor,
}

impl RecordDescriptor {
    pub fn new(key: impl Into<TypeKey>) -> Self {
        Self {
            key: key.into(),
            parent: None,
            fields: Vec::new(),
            constructor: Constructor::Default,
        }
    }

    pub fn field(mut self, name: impl Into<String>, type_ref: impl Into<TypeRef>) -> Self {
        let field = FieldDescriptor::new(self.key.clone(), name, type_ref);
        self.fields.push(field);
        self
    }

    pub fn transient_field(mut self, name: impl Into<String>, type_ref: impl Into<TypeRef>) -> Self {
        let mut field = FieldDescriptor::new(self.key.clone(), name, type_ref);
        field.transient = true;
        self.fields.push(field);
        self
    }

    pub fn immutable_field(mut self, name: impl Into<String>, type_ref: impl Into<TypeRef>) -> Self {
        let mut field = FieldDescriptor::new(self.key.clone(), name, type_ref);
        field.immutable = true;
        self.fields.push(field);
        self
    }

    pub fn extends(mut self, parent: impl Into<TypeKey>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn constructor(
        mut self,
        hook: impl Fn(&Instance) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.constructor = Constructor::Custom(Arc::new(hook));
        self
    }

    pub fn no_default_constructor(mut self) -> Self {
        self.constructor = Constructor::Unavailable;
        self
    }
}

/// A capability (method) exposed by an interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityDescriptor {
    pub name: String,
    pub returns: TypeRef,
}

impl CapabilityDescriptor {
    pub fn new(name: impl Into<String>, returns: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            returns: returns.into(),
        }
    }
}

/// An abstract type that must be mapped to a record or served by a stand-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceDescriptor {
    pub key: TypeKey,
    pub capabilities: Vec<CapabilityDescriptor>,
}

impl InterfaceDescriptor {
    pub fn new(key: impl Into<TypeKey>) -> Self {
        Self {
            key: key.into(),
            capabilities: Vec::new(),
        }
    }

    pub fn capability(mut self, name: impl Into<String>, returns: impl Into<TypeRef>) -> Self {
        self.capabilities.push(CapabilityDescriptor::new(name, returns));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDescriptor {
    pub key: TypeKey,
    pub variants: Vec<String>,
}

impl EnumDescriptor {
    pub fn new<I, S>(key: impl Into<TypeKey>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key: key.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerShape {
    Sequence,
    Set,
    Map,
}

/// A container type, abstract (mapped) or concrete (constructible).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerDescriptor {
    pub key: TypeKey,
    pub shape: ContainerShape,
    pub is_abstract: bool,
    pub capabilities: Vec<CapabilityDescriptor>,
}

impl ContainerDescriptor {
    pub fn concrete(key: impl Into<TypeKey>, shape: ContainerShape) -> Self {
        Self {
            key: key.into(),
            shape,
            is_abstract: false,
            capabilities: Vec::new(),
        }
    }

    /// Abstract containers expose `len` and `is_empty`.
    pub fn abstract_container(key: impl Into<TypeKey>, shape: ContainerShape) -> Self {
        Self {
            key: key.into(),
            shape,
            is_abstract: true,
            capabilities: vec![
                CapabilityDescriptor::new("len", TypeRef::primitive(Scalar::Int)),
                CapabilityDescriptor::new("is_empty", TypeRef::primitive(Scalar::Bool)),
            ],
        }
    }
}

/// Registered description of a type.
#[derive(Debug, Clone)]
pub enum TypeDescriptor {
    Record(RecordDescriptor),
    Interface(InterfaceDescriptor),
    Enum(EnumDescriptor),
    Container(ContainerDescriptor),
}

impl TypeDescriptor {
    pub fn key(&self) -> &TypeKey {
        match self {
            TypeDescriptor::Record(record) => &record.key,
            TypeDescriptor::Interface(interface) => &interface.key,
            TypeDescriptor::Enum(descriptor) => &descriptor.key,
            TypeDescriptor::Container(container) => &container.key,
        }
    }

    /// Interfaces and abstract containers cannot be constructed directly.
    pub fn is_abstract(&self) -> bool {
        match self {
            TypeDescriptor::Interface(_) => true,
            TypeDescriptor::Container(container) => container.is_abstract,
            TypeDescriptor::Record(_) | TypeDescriptor::Enum(_) => false,
        }
    }

    pub fn capabilities(&self) -> &[CapabilityDescriptor] {
        match self {
            TypeDescriptor::Interface(interface) => &interface.capabilities,
            TypeDescriptor::Container(container) => &container.capabilities,
            TypeDescriptor::Record(_) | TypeDescriptor::Enum(_) => &[],
        }
    }
}

impl From<RecordDescriptor> for TypeDescriptor {
    fn from(value: RecordDescriptor) -> Self {
        TypeDescriptor::Record(value)
    }
}

impl From<InterfaceDescriptor> for TypeDescriptor {
    fn from(value: InterfaceDescriptor) -> Self {
        TypeDescriptor::Interface(value)
    }
}

impl From<EnumDescriptor> for TypeDescriptor {
    fn from(value: EnumDescriptor) -> Self {
        TypeDescriptor::Enum(value)
    }
}

impl From<ContainerDescriptor> for TypeDescriptor {
    fn from(value: ContainerDescriptor) -> Self {
        TypeDescriptor::Container(value)
    }
}
