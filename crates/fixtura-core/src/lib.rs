//! Core contracts for Fixtura.
//!
//! This crate defines the explicit type model that stands in for runtime
//! reflection: type references, descriptors, the type registry, and the
//! dynamic value graph produced by the generator.

pub mod context;
pub mod descriptor;
pub mod error;
pub mod registry;
pub mod source;
pub mod types;
pub mod validation;
pub mod value;

pub use context::{FieldContext, FieldMember};
pub use descriptor::{
    CapabilityDescriptor, ConstructFn, Constructor, ContainerDescriptor, ContainerShape,
    EnumDescriptor, FieldDescriptor, InterfaceDescriptor, RecordDescriptor, TypeDescriptor,
};
pub use error::{Error, Result};
pub use registry::TypeRegistry;
pub use source::{ComputedValue, FieldNameValue, NullValue, StaticValue, ValueSource};
pub use types::{Scalar, TypeKey, TypeRef};
pub use validation::validate_registry;
pub use value::{CapabilityHandler, Container, EnumValue, Instance, StandIn, Value};
