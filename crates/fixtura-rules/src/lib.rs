//! Rule engine for Fixtura.
//!
//! Rules pair a [`Condition`] over a field with a value source, grouped by
//! the normalized type they return. When several rules match a field, the
//! one registered last wins.

pub mod builder;
pub mod condition;
pub mod errors;
pub mod rule;

pub use builder::{RuleTarget, RuleWhen};
pub use condition::{
    AndCondition, Condition, DeclaringInstanceType, DeclaringType, FieldNameEndsWith,
    FieldNameMatches, FieldNamePattern, FieldNameStartsWith, OrCondition,
};
pub use errors::RuleError;
pub use rule::{Rule, RuleSet, rule_key};
