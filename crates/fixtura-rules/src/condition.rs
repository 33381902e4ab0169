use std::fmt;
use std::sync::Arc;

use regex::Regex;

use fixtura_core::{FieldContext, TypeKey};

use crate::errors::RuleError;

/// Predicate over the field being generated and the instance that owns it.
pub trait Condition: Send + Sync + fmt::Debug {
    fn is_true(&self, ctx: &FieldContext<'_>) -> bool;
}

impl<C: Condition + ?Sized> Condition for Arc<C> {
    fn is_true(&self, ctx: &FieldContext<'_>) -> bool {
        (**self).is_true(ctx)
    }
}

impl<C: Condition + ?Sized> Condition for Box<C> {
    fn is_true(&self, ctx: &FieldContext<'_>) -> bool {
        (**self).is_true(ctx)
    }
}

/// Field name equals the given name exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNameMatches(pub String);

impl FieldNameMatches {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl Condition for FieldNameMatches {
    fn is_true(&self, ctx: &FieldContext<'_>) -> bool {
        ctx.field_name() == self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNameStartsWith(pub String);

impl FieldNameStartsWith {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self(prefix.into())
    }
}

impl Condition for FieldNameStartsWith {
    fn is_true(&self, ctx: &FieldContext<'_>) -> bool {
        ctx.field_name().starts_with(self.0.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNameEndsWith(pub String);

impl FieldNameEndsWith {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self(suffix.into())
    }
}

impl Condition for FieldNameEndsWith {
    fn is_true(&self, ctx: &FieldContext<'_>) -> bool {
        ctx.field_name().ends_with(self.0.as_str())
    }
}

/// Field name matches a regular expression. Anchor the pattern to match the
/// whole name.
#[derive(Debug, Clone)]
pub struct FieldNamePattern(Regex);

impl FieldNamePattern {
    pub fn new(pattern: &str) -> Result<Self, RuleError> {
        Ok(Self(Regex::new(pattern)?))
    }
}

impl Condition for FieldNamePattern {
    fn is_true(&self, ctx: &FieldContext<'_>) -> bool {
        self.0.is_match(ctx.field_name())
    }
}

/// The field is declared by the given type, regardless of which subtype is
/// being populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaringType(pub TypeKey);

impl DeclaringType {
    pub fn new(key: impl Into<TypeKey>) -> Self {
        Self(key.into())
    }
}

impl Condition for DeclaringType {
    fn is_true(&self, ctx: &FieldContext<'_>) -> bool {
        ctx.declaring_type() == &self.0
    }
}

/// The instance being populated has exactly the given runtime type, even
/// when the field itself is inherited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaringInstanceType(pub TypeKey);

impl DeclaringInstanceType {
    pub fn new(key: impl Into<TypeKey>) -> Self {
        Self(key.into())
    }
}

impl Condition for DeclaringInstanceType {
    fn is_true(&self, ctx: &FieldContext<'_>) -> bool {
        ctx.instance_type() == &self.0
    }
}

/// True when every inner condition holds; true when empty.
#[derive(Debug, Clone, Default)]
pub struct AndCondition(Vec<Arc<dyn Condition>>);

impl AndCondition {
    pub fn new(conditions: Vec<Arc<dyn Condition>>) -> Self {
        Self(conditions)
    }

    pub fn of(first: impl Condition + 'static, second: impl Condition + 'static) -> Self {
        Self(vec![Arc::new(first), Arc::new(second)])
    }

    pub fn with(mut self, condition: impl Condition + 'static) -> Self {
        self.0.push(Arc::new(condition));
        self
    }
}

impl Condition for AndCondition {
    fn is_true(&self, ctx: &FieldContext<'_>) -> bool {
        self.0.iter().all(|condition| condition.is_true(ctx))
    }
}

/// True when any inner condition holds; false when empty.
#[derive(Debug, Clone, Default)]
pub struct OrCondition(Vec<Arc<dyn Condition>>);

impl OrCondition {
    pub fn new(conditions: Vec<Arc<dyn Condition>>) -> Self {
        Self(conditions)
    }

    pub fn of(first: impl Condition + 'static, second: impl Condition + 'static) -> Self {
        Self(vec![Arc::new(first), Arc::new(second)])
    }

    pub fn with(mut self, condition: impl Condition + 'static) -> Self {
        self.0.push(Arc::new(condition));
        self
    }
}

impl Condition for OrCondition {
    fn is_true(&self, ctx: &FieldContext<'_>) -> bool {
        self.0.iter().any(|condition| condition.is_true(ctx))
    }
}
