use thiserror::Error;

use crate::types::TypeKey;

/// Core error type shared across Fixtura crates.
#[derive(Debug, Error)]
pub enum Error {
    /// A type key was referenced but never registered.
    #[error("unknown type: {0}")]
    UnknownType(TypeKey),
    /// A descriptor violates its own invariants.
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(String),
    /// The registry as a whole is inconsistent.
    #[error("invalid registry: {0}")]
    InvalidRegistry(String),
    /// A stand-in was asked for a capability its interfaces do not declare.
    #[error("unknown capability '{capability}' on {interface}")]
    UnknownCapability {
        interface: TypeKey,
        capability: String,
    },
    /// Generating a capability's return value failed.
    #[error("capability '{capability}' failed: {message}")]
    Capability { capability: String, message: String },
}

/// Convenience alias for results returned by Fixtura crates.
pub type Result<T> = std::result::Result<T, Error>;
