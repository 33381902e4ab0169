use std::sync::Arc;

use fixtura_core::{StaticValue, TypeRef, Value, ValueSource};

use crate::condition::{AndCondition, Condition, OrCondition};
use crate::errors::RuleError;
use crate::rule::{Rule, RuleSet, rule_key};

/// First step of `rules.for_type(ty).when(cond).then_return(value)`.
#[derive(Debug)]
pub struct RuleTarget<'a> {
    rules: &'a mut RuleSet,
    return_type: TypeRef,
}

impl<'a> RuleTarget<'a> {
    pub(crate) fn new(rules: &'a mut RuleSet, return_type: TypeRef) -> Self {
        Self {
            rules,
            return_type: rule_key(&return_type),
        }
    }

    pub fn when(self, condition: impl Condition + 'static) -> RuleWhen<'a> {
        RuleWhen {
            rules: self.rules,
            return_type: self.return_type,
            condition: Arc::new(condition),
        }
    }
}

/// A rule with its condition chosen, waiting for a value.
#[derive(Debug)]
pub struct RuleWhen<'a> {
    rules: &'a mut RuleSet,
    return_type: TypeRef,
    condition: Arc<dyn Condition>,
}

impl<'a> RuleWhen<'a> {
    /// Both the conditions so far and `condition` must hold.
    pub fn and(mut self, condition: impl Condition + 'static) -> Self {
        self.condition = Arc::new(AndCondition::new(vec![self.condition, Arc::new(condition)]));
        self
    }

    /// Either the conditions so far or `condition` must hold.
    pub fn or(mut self, condition: impl Condition + 'static) -> Self {
        self.condition = Arc::new(OrCondition::new(vec![self.condition, Arc::new(condition)]));
        self
    }

    /// Registers a rule returning a fixed value. Null is allowed.
    pub fn then_return(self, value: impl Into<Value>) -> Result<(), RuleError> {
        let value = value.into();
        if !self.return_type.accepts(&value) {
            return Err(RuleError::TypeMismatch {
                expected: self.return_type,
                found: describe(&value),
            });
        }
        let source = StaticValue::new(self.return_type.clone(), value);
        self.then_use(source)
    }

    /// Registers a rule backed by an arbitrary value source.
    pub fn then_use(self, source: impl ValueSource + 'static) -> Result<(), RuleError> {
        let source_type = rule_key(&source.type_ref());
        if source_type != self.return_type {
            return Err(RuleError::TypeMismatch {
                expected: self.return_type,
                found: source_type.to_string(),
            });
        }
        let rule = Rule::from_parts(self.condition, Arc::new(source), self.return_type);
        self.rules.add(rule);
        Ok(())
    }
}

fn describe(value: &Value) -> String {
    value
        .runtime_type()
        .map(|type_ref| type_ref.to_string())
        .unwrap_or_else(|| "null".to_string())
}
