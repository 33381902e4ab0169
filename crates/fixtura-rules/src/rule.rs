use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use fixtura_core::{FieldContext, StaticValue, TypeRef, Value, ValueSource};

use crate::builder::RuleTarget;
use crate::condition::{Condition, FieldNameEndsWith, FieldNameMatches, FieldNameStartsWith};
use crate::errors::RuleError;

/// Key rules are grouped under: the normalized type with container
/// arguments erased, so a rule for `List` covers `List<Foo>` fields.
pub fn rule_key(type_ref: &TypeRef) -> TypeRef {
    match type_ref.normalized() {
        TypeRef::Container { container, .. } => TypeRef::raw(container),
        other => other,
    }
}

/// A condition paired with the value to produce when it holds.
#[derive(Debug, Clone)]
pub struct Rule {
    condition: Arc<dyn Condition>,
    source: Arc<dyn ValueSource>,
    return_type: TypeRef,
}

impl Rule {
    /// Rule whose return type is taken from the source.
    pub fn new(condition: impl Condition + 'static, source: impl ValueSource + 'static) -> Self {
        let return_type = rule_key(&source.type_ref());
        Self {
            condition: Arc::new(condition),
            source: Arc::new(source),
            return_type,
        }
    }

    /// Rule returning a fixed value; the return type is the value's runtime type.
    pub fn from_value(
        condition: impl Condition + 'static,
        value: impl Into<Value>,
    ) -> Result<Self, RuleError> {
        let value = value.into();
        let type_ref = value.runtime_type().ok_or(RuleError::UntypedValue)?;
        Ok(Self::new(condition, StaticValue::new(type_ref, value)))
    }

    pub fn field_name_matches(name: &str, value: impl Into<Value>) -> Result<Self, RuleError> {
        Self::from_value(FieldNameMatches::new(name), value)
    }

    pub fn field_name_starts_with(prefix: &str, value: impl Into<Value>) -> Result<Self, RuleError> {
        Self::from_value(FieldNameStartsWith::new(prefix), value)
    }

    pub fn field_name_ends_with(suffix: &str, value: impl Into<Value>) -> Result<Self, RuleError> {
        Self::from_value(FieldNameEndsWith::new(suffix), value)
    }

    pub(crate) fn from_parts(
        condition: Arc<dyn Condition>,
        source: Arc<dyn ValueSource>,
        return_type: TypeRef,
    ) -> Self {
        Self {
            condition,
            source,
            return_type: rule_key(&return_type),
        }
    }

    pub fn return_type(&self) -> &TypeRef {
        &self.return_type
    }

    pub fn condition(&self) -> &dyn Condition {
        self.condition.as_ref()
    }

    pub fn source(&self) -> &dyn ValueSource {
        self.source.as_ref()
    }

    pub fn applies_to(&self, ctx: &FieldContext<'_>) -> bool {
        self.condition.is_true(ctx)
    }

    pub fn value_for(&self, ctx: &FieldContext<'_>) -> Value {
        self.source.value_for(ctx)
    }
}

/// Rules grouped by return type, each group kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: HashMap<TypeRef, Vec<Rule>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, rule: Rule) {
        self.rules
            .entry(rule.return_type.clone())
            .or_default()
            .push(rule);
    }

    /// Starts a fluent rule for fields of the given type.
    pub fn for_type(&mut self, type_ref: impl Into<TypeRef>) -> RuleTarget<'_> {
        RuleTarget::new(self, type_ref.into())
    }

    pub fn rules_for(&self, type_ref: &TypeRef) -> &[Rule] {
        self.rules
            .get(&rule_key(type_ref))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, type_ref: &TypeRef) -> bool {
        !self.rules_for(type_ref).is_empty()
    }

    /// Drops every rule for the given type.
    pub fn remove(&mut self, type_ref: &TypeRef) -> Vec<Rule> {
        self.rules.remove(&rule_key(type_ref)).unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.rules.clear();
    }

    pub fn len(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Scans every rule for the field's type and returns the last one whose
    /// condition holds.
    pub fn find_match(&self, type_ref: &TypeRef, ctx: &FieldContext<'_>) -> Option<&Rule> {
        let mut matched = None;
        for (index, rule) in self.rules_for(type_ref).iter().enumerate() {
            if rule.applies_to(ctx) {
                matched = Some((index, rule));
            }
        }
        let (index, rule) = matched?;
        debug!(
            field = %ctx.field_name(),
            declaring_type = %ctx.declaring_type(),
            rule_type = %rule.return_type,
            index,
            "rule matched"
        );
        Some(rule)
    }
}
