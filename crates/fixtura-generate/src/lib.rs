//! Population engine for Fixtura.
//!
//! A [`Generator`] walks the types registered in its [`Configuration`] and
//! returns fully populated value graphs: rules first, then defaults, then
//! recursive construction, with containers auto-filled, abstract types
//! resolved through the type mapping, and cycles cut by a per-call path.

pub mod cache;
mod collections;
pub mod config;
pub mod defaults;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod model;
pub mod path;
pub mod standin;

pub use cache::InstanceCache;
pub use config::Configuration;
pub use defaults::DefaultValues;
pub use engine::Generator;
pub use errors::{ConfigError, GenerationError, InstantiationError};
pub use model::{
    CacheOverrides, DEFAULT_COLLECTION_AUTO_FILL_COUNT, GenerationPolicy, policy_json_schema,
};
pub use path::InstantiationPath;
pub use standin::StandInFactory;
