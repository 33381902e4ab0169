use fixtura_core::{TypeDescriptor, TypeKey, TypeRef, TypeRegistry, validate_registry};
use fixtura_rules::{RuleSet, RuleTarget};

use crate::defaults::DefaultValues;
use crate::errors::ConfigError;
use crate::model::{CacheOverrides, GenerationPolicy};

/// Everything a generator reads during a pass.
///
/// Mutate it between passes only; a pass sees a read-only snapshot.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    types: TypeRegistry,
    defaults: DefaultValues,
    rules: RuleSet,
    policy: GenerationPolicy,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: GenerationPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn types_mut(&mut self) -> &mut TypeRegistry {
        &mut self.types
    }

    /// Shorthand for registering a descriptor in the type registry.
    pub fn register(&mut self, descriptor: impl Into<TypeDescriptor>) -> Result<(), ConfigError> {
        self.types.register(descriptor)?;
        Ok(())
    }

    pub fn defaults(&self) -> &DefaultValues {
        &self.defaults
    }

    pub fn defaults_mut(&mut self) -> &mut DefaultValues {
        &mut self.defaults
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn rules_mut(&mut self) -> &mut RuleSet {
        &mut self.rules
    }

    /// Starts a fluent rule: `config.for_type(ty).when(cond).then_return(value)`.
    pub fn for_type(&mut self, type_ref: impl Into<TypeRef>) -> RuleTarget<'_> {
        self.rules.for_type(type_ref)
    }

    pub fn policy(&self) -> &GenerationPolicy {
        &self.policy
    }

    pub fn set_policy(&mut self, policy: GenerationPolicy) {
        self.policy = policy;
    }

    pub fn cache_enabled(&self) -> bool {
        self.policy.cache_enabled
    }

    pub fn set_cache_enabled(&mut self, enabled: bool) {
        self.policy.cache_enabled = enabled;
    }

    pub fn cache_overrides(&self) -> &CacheOverrides {
        &self.policy.cache_overrides
    }

    pub fn cache_overrides_mut(&mut self) -> &mut CacheOverrides {
        &mut self.policy.cache_overrides
    }

    pub fn use_cache(&self, key: &TypeKey) -> bool {
        self.policy.use_cache(key)
    }

    pub fn proxy_unmapped_interfaces(&self) -> bool {
        self.policy.proxy_unmapped_interfaces
    }

    pub fn set_proxy_unmapped_interfaces(&mut self, enabled: bool) {
        self.policy.proxy_unmapped_interfaces = enabled;
    }

    pub fn collection_auto_fill_count(&self) -> u32 {
        self.policy.collection_auto_fill_count
    }

    /// Rejects negative counts; the previous count is kept on error.
    pub fn set_collection_auto_fill_count(&mut self, count: i64) -> Result<(), ConfigError> {
        if count < 0 {
            return Err(ConfigError::NegativeAutoFillCount(count));
        }
        let count = u32::try_from(count).map_err(|_| ConfigError::AutoFillCountTooLarge(count))?;
        self.policy.collection_auto_fill_count = count;
        Ok(())
    }

    /// Checks the type registry for dangling references and bad mappings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_registry(&self.types)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixtura_core::RecordDescriptor;

    #[test]
    fn negative_fill_count_is_rejected_at_set_time() {
        let mut config = Configuration::new();
        let err = config
            .set_collection_auto_fill_count(-1)
            .expect_err("negative");
        assert!(matches!(err, ConfigError::NegativeAutoFillCount(-1)));
        assert_eq!(config.collection_auto_fill_count(), 3);

        config.set_collection_auto_fill_count(0).expect("zero");
        assert_eq!(config.collection_auto_fill_count(), 0);
    }

    #[test]
    fn validate_reports_dangling_references() {
        let mut config = Configuration::new();
        config
            .register(RecordDescriptor::new("Outer").field("inner", TypeRef::named("Inner")))
            .expect("register");
        assert!(config.validate().is_err());
        config
            .register(RecordDescriptor::new("Inner"))
            .expect("register");
        config.validate().expect("valid");
    }
}
