use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use fixtura_core::{FieldNameValue, NullValue, Scalar, StaticValue, TypeRef, Value, ValueSource};

use crate::errors::ConfigError;

/// Canonical starter values keyed by declared type.
///
/// Primitive and boxed forms are separate keys, so replacing the default for
/// `Option<int>` leaves `int` untouched.
#[derive(Debug, Clone)]
pub struct DefaultValues {
    entries: HashMap<TypeRef, Arc<dyn ValueSource>>,
}

impl Default for DefaultValues {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultValues {
    /// Seeded with the built-in defaults.
    pub fn new() -> Self {
        let mut defaults = Self::empty();
        defaults.seed();
        defaults
    }

    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn put(&mut self, type_ref: impl Into<TypeRef>, source: impl ValueSource + 'static) {
        self.entries.insert(type_ref.into(), Arc::new(source));
    }

    /// Registers a fixed value after checking the type can hold it.
    pub fn put_static(
        &mut self,
        type_ref: impl Into<TypeRef>,
        value: impl Into<Value>,
    ) -> Result<(), ConfigError> {
        let type_ref = type_ref.into();
        let value = value.into();
        if value.is_null() || !type_ref.accepts(&value) {
            return Err(ConfigError::DefaultTypeMismatch {
                found: format!("{value:?}"),
                expected: type_ref,
            });
        }
        self.put(type_ref.clone(), StaticValue::new(type_ref, value));
        Ok(())
    }

    /// Makes every value of the type null.
    pub fn put_null(&mut self, type_ref: impl Into<TypeRef>) {
        let type_ref = type_ref.into();
        self.put(type_ref.clone(), NullValue::new(type_ref));
    }

    pub fn get(&self, type_ref: &TypeRef) -> Option<&dyn ValueSource> {
        self.entries.get(type_ref).map(|source| source.as_ref())
    }

    pub fn contains(&self, type_ref: &TypeRef) -> bool {
        self.entries.contains_key(type_ref)
    }

    pub fn remove(&mut self, type_ref: &TypeRef) -> bool {
        self.entries.remove(type_ref).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drops every custom entry and restores the built-ins.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.seed();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn seed(&mut self) {
        self.put(TypeRef::Text, FieldNameValue);

        for scalar in Scalar::ALL {
            let value = starter_value(scalar);
            for type_ref in [TypeRef::primitive(scalar), TypeRef::boxed(scalar)] {
                self.put(type_ref.clone(), StaticValue::new(type_ref.clone(), value.clone()));
                let array = TypeRef::array(type_ref.clone());
                let items = Value::Array {
                    element: type_ref,
                    items: vec![value.clone()],
                };
                self.put(array.clone(), StaticValue::new(array, items));
            }
        }

        self.put(TypeRef::Date, StaticValue::new(TypeRef::Date, default_date()));
        self.put(
            TypeRef::Uuid,
            StaticValue::new(TypeRef::Uuid, Uuid::from_u128(1)),
        );
    }
}

fn starter_value(scalar: Scalar) -> Value {
    match scalar {
        Scalar::Bool => Value::Bool(true),
        Scalar::Byte => Value::Byte(1),
        Scalar::Short => Value::Short(1),
        Scalar::Int => Value::Int(1),
        Scalar::Long => Value::Long(1),
        Scalar::Float => Value::Float(1.0),
        Scalar::Double => Value::Double(1.0),
        Scalar::Char => Value::Char('A'),
    }
}

fn default_date() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}
