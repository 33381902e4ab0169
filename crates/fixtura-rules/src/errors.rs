use thiserror::Error;

use fixtura_core::TypeRef;

/// Errors raised while building rules.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("invalid field name pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    #[error("rule for {expected} cannot return {found}")]
    TypeMismatch { expected: TypeRef, found: String },
    #[error("cannot infer a rule type from a null value")]
    UntypedValue,
}
