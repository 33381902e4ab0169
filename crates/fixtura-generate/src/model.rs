use std::collections::BTreeMap;

use jsonschema::JSONSchema;
use schemars::JsonSchema;
use schemars::schema::RootSchema;
use schemars::schema_for;
use serde::{Deserialize, Serialize};

use fixtura_core::TypeKey;

use crate::errors::ConfigError;

/// Number of elements generated into a container when no count is given.
pub const DEFAULT_COLLECTION_AUTO_FILL_COUNT: u32 = 3;

/// Per-type cache switches that win over [`GenerationPolicy::cache_enabled`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct CacheOverrides(BTreeMap<String, bool>);

impl CacheOverrides {
    pub fn set(&mut self, key: impl Into<TypeKey>, cache: bool) {
        self.0.insert(key.into().as_str().to_string(), cache);
    }

    pub fn get(&self, key: &TypeKey) -> Option<bool> {
        self.0.get(key.as_str()).copied()
    }

    pub fn remove(&mut self, key: &TypeKey) -> Option<bool> {
        self.0.remove(key.as_str())
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Switches that shape a generation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationPolicy {
    /// Keep one instance per type and return it on every request.
    pub cache_enabled: bool,
    /// Per-type overrides of `cache_enabled`.
    pub cache_overrides: CacheOverrides,
    /// Serve unmapped interfaces with generated stand-ins instead of failing.
    pub proxy_unmapped_interfaces: bool,
    /// Elements generated into each container field.
    pub collection_auto_fill_count: u32,
}

impl Default for GenerationPolicy {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            cache_overrides: CacheOverrides::default(),
            proxy_unmapped_interfaces: false,
            collection_auto_fill_count: DEFAULT_COLLECTION_AUTO_FILL_COUNT,
        }
    }
}

impl GenerationPolicy {
    /// Whether instances of `key` are cached. An override always wins.
    pub fn use_cache(&self, key: &TypeKey) -> bool {
        self.cache_overrides.get(key).unwrap_or(self.cache_enabled)
    }

    /// Parses a policy document after validating it against
    /// [`policy_json_schema`].
    pub fn from_json(value: &serde_json::Value) -> Result<Self, ConfigError> {
        let schema = serde_json::to_value(policy_json_schema())?;
        let compiled =
            JSONSchema::compile(&schema).map_err(|err| ConfigError::Schema(err.to_string()))?;

        if let Err(errors) = compiled.validate(value) {
            let messages: Vec<String> = errors
                .map(|error| {
                    let path = error.instance_path.to_string();
                    if path.is_empty() {
                        error.to_string()
                    } else {
                        format!("{path}: {error}")
                    }
                })
                .collect();
            return Err(ConfigError::InvalidPolicy(messages.join("; ")));
        }

        Ok(serde_json::from_value(value.clone())?)
    }
}

/// Emit the JSON Schema for a generation policy document.
pub fn policy_json_schema() -> RootSchema {
    schema_for!(GenerationPolicy)
}
