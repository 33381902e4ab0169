use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDateTime;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::descriptor::{ContainerShape, FieldDescriptor};
use crate::error::{Error, Result};
use crate::types::{Scalar, TypeKey, TypeRef};

/// A generated value.
///
/// Scalars compare by value. `Object`, `Container` and `StandIn` are shared
/// handles and compare by identity, so two values are equal only when they
/// point at the same underlying instance.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    Text(String),
    Date(NaiveDateTime),
    Uuid(Uuid),
    Array { element: TypeRef, items: Vec<Value> },
    Enum(EnumValue),
    Container(Container),
    Object(Instance),
    StandIn(StandIn),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn scalar(&self) -> Option<Scalar> {
        match self {
            Value::Bool(_) => Some(Scalar::Bool),
            Value::Byte(_) => Some(Scalar::Byte),
            Value::Short(_) => Some(Scalar::Short),
            Value::Int(_) => Some(Scalar::Int),
            Value::Long(_) => Some(Scalar::Long),
            Value::Float(_) => Some(Scalar::Float),
            Value::Double(_) => Some(Scalar::Double),
            Value::Char(_) => Some(Scalar::Char),
            _ => None,
        }
    }

    /// Type observed at runtime, with scalars in their boxed form.
    ///
    /// Returns `None` for null, which carries no type.
    pub fn runtime_type(&self) -> Option<TypeRef> {
        if let Some(scalar) = self.scalar() {
            return Some(TypeRef::boxed(scalar));
        }
        match self {
            Value::Text(_) => Some(TypeRef::Text),
            Value::Date(_) => Some(TypeRef::Date),
            Value::Uuid(_) => Some(TypeRef::Uuid),
            Value::Array { element, .. } => Some(TypeRef::array(element.clone())),
            Value::Enum(value) => Some(TypeRef::named(value.type_key.clone())),
            Value::Container(container) => Some(TypeRef::raw(container.concrete().clone())),
            Value::Object(instance) => Some(TypeRef::named(instance.type_key().clone())),
            Value::StandIn(stand_in) => stand_in.interfaces().first().cloned().map(TypeRef::from),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Byte(value) => Some(i64::from(*value)),
            Value::Short(value) => Some(i64::from(*value)),
            Value::Int(value) => Some(i64::from(*value)),
            Value::Long(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(value) => Some(f64::from(*value)),
            Value::Double(value) => Some(*value),
            other => other.as_i64().map(|value| value as f64),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array { items, .. } => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumValue> {
        match self {
            Value::Enum(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Value::Object(instance) => Some(instance),
            _ => None,
        }
    }

    pub fn as_container(&self) -> Option<&Container> {
        match self {
            Value::Container(container) => Some(container),
            _ => None,
        }
    }

    pub fn as_stand_in(&self) -> Option<&StandIn> {
        match self {
            Value::StandIn(stand_in) => Some(stand_in),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Uuid(a), Value::Uuid(b)) => a == b,
            (
                Value::Array {
                    element: a_element,
                    items: a_items,
                },
                Value::Array {
                    element: b_element,
                    items: b_items,
                },
            ) => a_element == b_element && a_items == b_items,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::Container(a), Value::Container(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::StandIn(a), Value::StandIn(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i8> for Value {
    fn from(value: i8) -> Self {
        Value::Byte(value)
    }
}

impl From<i16> for Value {
    fn from(value: i16) -> Self {
        Value::Short(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Long(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::Char(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::Date(value)
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Value::Uuid(value)
    }
}

impl From<Instance> for Value {
    fn from(value: Instance) -> Self {
        Value::Object(value)
    }
}

impl From<Container> for Value {
    fn from(value: Container) -> Self {
        Value::Container(value)
    }
}

/// A selected enum variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub type_key: TypeKey,
    pub variant: String,
}

/// Value rejected by a field's declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessError {
    pub type_key: TypeKey,
    pub field: String,
    pub reason: String,
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot assign field '{}' on {}: {}",
            self.field, self.type_key, self.reason
        )
    }
}

impl std::error::Error for AccessError {}

/// Shared, mutable record instance.
#[derive(Clone)]
pub struct Instance {
    inner: Arc<InstanceInner>,
}

struct InstanceInner {
    type_key: TypeKey,
    fields: RwLock<BTreeMap<String, Value>>,
}

impl Instance {
    /// Creates an instance whose fields hold their language defaults.
    pub fn new<'a>(
        type_key: impl Into<TypeKey>,
        fields: impl IntoIterator<Item = &'a FieldDescriptor>,
    ) -> Self {
        let fields = fields
            .into_iter()
            .map(|field| (field.name.clone(), field.type_ref.language_default()))
            .collect();
        Self {
            inner: Arc::new(InstanceInner {
                type_key: type_key.into(),
                fields: RwLock::new(fields),
            }),
        }
    }

    pub fn type_key(&self) -> &TypeKey {
        &self.inner.type_key
    }

    /// Current value of a field, or `None` when the instance has no such field.
    pub fn get(&self, field: &str) -> Option<Value> {
        self.inner.fields.read().get(field).cloned()
    }

    /// Writes a field without checking its declared type.
    pub fn set(&self, field: &str, value: Value) {
        self.inner.fields.write().insert(field.to_string(), value);
    }

    /// Writes a field after checking that its declared type accepts the value.
    pub fn assign(&self, field: &FieldDescriptor, value: Value) -> std::result::Result<(), AccessError> {
        if !field.type_ref.accepts(&value) {
            return Err(AccessError {
                type_key: self.type_key().clone(),
                field: field.name.clone(),
                reason: format!("{} cannot hold {value:?}", field.type_ref),
            });
        }
        if !self.inner.fields.read().contains_key(&field.name) {
            return Err(AccessError {
                type_key: self.type_key().clone(),
                field: field.name.clone(),
                reason: "no such field".to_string(),
            });
        }
        self.set(&field.name, value);
        Ok(())
    }

    pub fn field_names(&self) -> Vec<String> {
        self.inner.fields.read().keys().cloned().collect()
    }

    /// Text value of a field, if it holds one.
    pub fn text(&self, field: &str) -> Option<String> {
        self.get(field)
            .and_then(|value| value.as_str().map(str::to_string))
    }

    /// Nested instance held by a field, if any.
    pub fn object(&self, field: &str) -> Option<Instance> {
        match self.get(field) {
            Some(Value::Object(instance)) => Some(instance),
            _ => None,
        }
    }

    /// Container held by a field, if any.
    pub fn container(&self, field: &str) -> Option<Container> {
        match self.get(field) {
            Some(Value::Container(container)) => Some(container),
            _ => None,
        }
    }

    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Instance {
    // Field values are omitted: generated graphs may be cyclic.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type_key", self.type_key())
            .field("fields", &self.field_names())
            .finish()
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

/// Shared, mutable container instance.
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

struct ContainerInner {
    concrete: TypeKey,
    shape: ContainerShape,
    storage: RwLock<Storage>,
}

enum Storage {
    Items(Vec<Value>),
    Entries(Vec<(Value, Value)>),
}

impl Container {
    pub fn new(concrete: impl Into<TypeKey>, shape: ContainerShape) -> Self {
        let storage = match shape {
            ContainerShape::Map => Storage::Entries(Vec::new()),
            ContainerShape::Sequence | ContainerShape::Set => Storage::Items(Vec::new()),
        };
        Self {
            inner: Arc::new(ContainerInner {
                concrete: concrete.into(),
                shape,
                storage: RwLock::new(storage),
            }),
        }
    }

    pub fn concrete(&self) -> &TypeKey {
        &self.inner.concrete
    }

    pub fn shape(&self) -> ContainerShape {
        self.inner.shape
    }

    /// Adds an element. Sets ignore elements equal to one already present.
    ///
    /// Returns whether the container changed.
    pub fn push(&self, value: Value) -> Result<bool> {
        let mut storage = self.inner.storage.write();
        match &mut *storage {
            Storage::Items(items) => {
                if self.inner.shape == ContainerShape::Set && items.contains(&value) {
                    return Ok(false);
                }
                items.push(value);
                Ok(true)
            }
            Storage::Entries(_) => Err(Error::InvalidDescriptor(format!(
                "{} holds entries, not elements",
                self.inner.concrete
            ))),
        }
    }

    /// Inserts or replaces a map entry.
    pub fn insert(&self, key: Value, value: Value) -> Result<()> {
        let mut storage = self.inner.storage.write();
        match &mut *storage {
            Storage::Entries(entries) => {
                if let Some(entry) = entries.iter_mut().find(|(existing, _)| *existing == key) {
                    entry.1 = value;
                } else {
                    entries.push((key, value));
                }
                Ok(())
            }
            Storage::Items(_) => Err(Error::InvalidDescriptor(format!(
                "{} holds elements, not entries",
                self.inner.concrete
            ))),
        }
    }

    pub fn len(&self) -> usize {
        match &*self.inner.storage.read() {
            Storage::Items(items) => items.len(),
            Storage::Entries(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn items(&self) -> Vec<Value> {
        match &*self.inner.storage.read() {
            Storage::Items(items) => items.clone(),
            Storage::Entries(_) => Vec::new(),
        }
    }

    pub fn entries(&self) -> Vec<(Value, Value)> {
        match &*self.inner.storage.read() {
            Storage::Entries(entries) => entries.clone(),
            Storage::Items(_) => Vec::new(),
        }
    }

    pub fn ptr_eq(&self, other: &Container) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("concrete", self.concrete())
            .field("shape", &self.shape())
            .field("len", &self.len())
            .finish()
    }
}

/// Produces values for the capabilities of a stand-in.
pub trait CapabilityHandler: Send + Sync {
    fn capabilities(&self) -> Vec<String>;

    fn invoke(&self, capability: &str, args: &[Value]) -> Result<Value>;
}

/// Dynamic stand-in satisfying one or more interfaces.
#[derive(Clone)]
pub struct StandIn {
    inner: Arc<StandInInner>,
}

struct StandInInner {
    interfaces: Vec<TypeKey>,
    handler: Box<dyn CapabilityHandler>,
}

impl StandIn {
    pub fn new(interfaces: Vec<TypeKey>, handler: impl CapabilityHandler + 'static) -> Self {
        Self {
            inner: Arc::new(StandInInner {
                interfaces,
                handler: Box::new(handler),
            }),
        }
    }

    pub fn interfaces(&self) -> &[TypeKey] {
        &self.inner.interfaces
    }

    pub fn capabilities(&self) -> Vec<String> {
        self.inner.handler.capabilities()
    }

    pub fn invoke(&self, capability: &str, args: &[Value]) -> Result<Value> {
        self.inner.handler.invoke(capability, args)
    }

    pub fn ptr_eq(&self, other: &StandIn) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for StandIn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StandIn")
            .field("interfaces", &self.interfaces())
            .finish()
    }
}
