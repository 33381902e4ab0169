use thiserror::Error;

use fixtura_core::{TypeKey, TypeRef};
use fixtura_rules::RuleError;

/// Failure to produce a value for one type.
#[derive(Debug, Error)]
pub enum InstantiationError {
    #[error("unknown type: {0}")]
    UnknownType(TypeKey),
    #[error("abstract type {0} has no mapped concrete type")]
    UnmappedInterface(TypeKey),
    #[error("{0} has no zero-argument constructor")]
    NoConstructor(TypeKey),
    #[error("constructor of {type_key} failed: {message}")]
    ConstructorFailed { type_key: TypeKey, message: String },
    #[error("{0} cannot be constructed")]
    NotConstructible(TypeRef),
    #[error(transparent)]
    Model(#[from] fixtura_core::Error),
}

impl InstantiationError {
    /// Construction failures leave the field unset and generation continues.
    /// Everything else aborts the subtree being generated.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            InstantiationError::NoConstructor(_)
                | InstantiationError::ConstructorFailed { .. }
                | InstantiationError::NotConstructible(_)
        )
    }
}

/// Errors raised while configuring a generator.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("collection auto-fill count cannot be negative: {0}")]
    NegativeAutoFillCount(i64),
    #[error("collection auto-fill count is too large: {0}")]
    AutoFillCountTooLarge(i64),
    #[error("default for {expected} cannot be {found}")]
    DefaultTypeMismatch { expected: TypeRef, found: String },
    #[error("invalid policy: {0}")]
    InvalidPolicy(String),
    #[error("schema error: {0}")]
    Schema(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Model(#[from] fixtura_core::Error),
    #[error(transparent)]
    Rule(#[from] RuleError),
}

/// Errors returned by [`crate::Generator`].
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("failed to initialize {type_ref}: {source}")]
    Initialization {
        type_ref: TypeRef,
        source: InstantiationError,
    },
    #[error("expected {expected} to produce {wanted}, got {found}")]
    UnexpectedValue {
        expected: TypeRef,
        wanted: &'static str,
        found: String,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}
