use std::fmt;
use std::sync::Arc;

use crate::context::FieldContext;
use crate::types::TypeRef;
use crate::value::Value;

/// Produces the value written for a default or a matched rule.
pub trait ValueSource: Send + Sync + fmt::Debug {
    /// Type of the produced value.
    fn type_ref(&self) -> TypeRef;

    /// Value used when there is no field context.
    fn value(&self) -> Value;

    /// Value for a specific field. Defaults to [`ValueSource::value`].
    fn value_for(&self, ctx: &FieldContext<'_>) -> Value {
        let _ = ctx;
        self.value()
    }

    /// Dispatches to `value_for` when a context is available.
    fn resolve(&self, ctx: Option<&FieldContext<'_>>) -> Value {
        match ctx {
            Some(ctx) => self.value_for(ctx),
            None => self.value(),
        }
    }
}

/// Returns the same value every time.
#[derive(Debug, Clone)]
pub struct StaticValue {
    type_ref: TypeRef,
    value: Value,
}

impl StaticValue {
    pub fn new(type_ref: impl Into<TypeRef>, value: impl Into<Value>) -> Self {
        Self {
            type_ref: type_ref.into(),
            value: value.into(),
        }
    }
}

impl ValueSource for StaticValue {
    fn type_ref(&self) -> TypeRef {
        self.type_ref.clone()
    }

    fn value(&self) -> Value {
        self.value.clone()
    }
}

/// Always null.
#[derive(Debug, Clone)]
pub struct NullValue {
    type_ref: TypeRef,
}

impl NullValue {
    pub fn new(type_ref: impl Into<TypeRef>) -> Self {
        Self {
            type_ref: type_ref.into(),
        }
    }
}

impl ValueSource for NullValue {
    fn type_ref(&self) -> TypeRef {
        self.type_ref.clone()
    }

    fn value(&self) -> Value {
        Value::Null
    }
}

/// Text equal to the target field's name; empty without a field.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldNameValue;

impl ValueSource for FieldNameValue {
    fn type_ref(&self) -> TypeRef {
        TypeRef::Text
    }

    fn value(&self) -> Value {
        Value::Text(String::new())
    }

    fn value_for(&self, ctx: &FieldContext<'_>) -> Value {
        Value::Text(ctx.field_name().to_string())
    }
}

type ComputeFn = dyn Fn(Option<&FieldContext<'_>>) -> Value + Send + Sync;

/// Value computed from the optional field context.
#[derive(Clone)]
pub struct ComputedValue {
    type_ref: TypeRef,
    compute: Arc<ComputeFn>,
}

impl ComputedValue {
    pub fn new(
        type_ref: impl Into<TypeRef>,
        compute: impl Fn(Option<&FieldContext<'_>>) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            type_ref: type_ref.into(),
            compute: Arc::new(compute),
        }
    }
}

impl fmt::Debug for ComputedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComputedValue")
            .field("type_ref", &self.type_ref)
            .finish_non_exhaustive()
    }
}

impl ValueSource for ComputedValue {
    fn type_ref(&self) -> TypeRef {
        self.type_ref.clone()
    }

    fn value(&self) -> Value {
        (self.compute)(None)
    }

    fn value_for(&self, ctx: &FieldContext<'_>) -> Value {
        (self.compute)(Some(ctx))
    }
}
