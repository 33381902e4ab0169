use std::sync::Arc;

use tracing::{debug, error, info, warn};

use fixtura_core::{
    Constructor, Container, EnumDescriptor, EnumValue, FieldContext, FieldDescriptor,
    FieldMember, Instance, RecordDescriptor, TypeDescriptor, TypeKey, TypeRef, Value,
};

use crate::cache::InstanceCache;
use crate::config::Configuration;
use crate::errors::{GenerationError, InstantiationError};
use crate::path::InstantiationPath;
use crate::standin::StandInFactory;

type Result<T> = std::result::Result<T, InstantiationError>;

/// Entry point for generating populated object graphs.
///
/// Cloning a generator shares its configuration and cache.
#[derive(Debug, Clone)]
pub struct Generator {
    config: Arc<Configuration>,
    cache: Arc<InstanceCache>,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    /// Caching on, stand-ins off.
    pub fn new() -> Self {
        Self::with_configuration(Configuration::new())
    }

    pub fn with_cache(enabled: bool) -> Self {
        Self::with_cache_and_proxies(enabled, false)
    }

    pub fn with_cache_and_proxies(cache: bool, proxies: bool) -> Self {
        let mut config = Configuration::new();
        config.set_cache_enabled(cache);
        config.set_proxy_unmapped_interfaces(proxies);
        Self::with_configuration(config)
    }

    pub fn with_configuration(config: Configuration) -> Self {
        Self {
            config: Arc::new(config),
            cache: Arc::new(InstanceCache::new()),
        }
    }

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    /// Copies the configuration first if a clone of this generator still
    /// shares it.
    pub fn configuration_mut(&mut self) -> &mut Configuration {
        Arc::make_mut(&mut self.config)
    }

    pub fn cache(&self) -> &InstanceCache {
        &self.cache
    }

    /// Cached-or-fresh, fully populated value of the given type.
    pub fn get(&self, type_ref: impl Into<TypeRef>) -> std::result::Result<Value, GenerationError> {
        self.get_with(type_ref, true)
    }

    /// With `populate` false the value is constructed but its fields keep
    /// their language defaults, and the cache is neither read nor written.
    pub fn get_with(
        &self,
        type_ref: impl Into<TypeRef>,
        populate: bool,
    ) -> std::result::Result<Value, GenerationError> {
        let type_ref = type_ref.into();
        debug!(value_type = %type_ref, populate, "generation requested");
        let mut session = self.session();
        session
            .generate(&type_ref, populate)
            .map_err(|source| GenerationError::Initialization { type_ref, source })
    }

    /// Like [`Generator::get`] for a record type, unwrapping the instance.
    pub fn get_instance(
        &self,
        key: impl Into<TypeKey>,
    ) -> std::result::Result<Instance, GenerationError> {
        let type_ref = TypeRef::named(key);
        match self.get(&type_ref)? {
            Value::Object(instance) => Ok(instance),
            other => Err(GenerationError::UnexpectedValue {
                expected: type_ref,
                wanted: "an instance",
                found: format!("{other:?}"),
            }),
        }
    }

    /// `count` independent top-level requests for the same type.
    pub fn get_list(
        &self,
        type_ref: impl Into<TypeRef>,
        count: usize,
    ) -> std::result::Result<Vec<Value>, GenerationError> {
        let type_ref = type_ref.into();
        (0..count).map(|_| self.get(&type_ref)).collect()
    }

    /// [`Generator::get_list`] with the configured auto-fill count.
    pub fn get_auto_list(
        &self,
        type_ref: impl Into<TypeRef>,
    ) -> std::result::Result<Vec<Value>, GenerationError> {
        let count = self.config.collection_auto_fill_count() as usize;
        self.get_list(type_ref, count)
    }

    /// Populates an existing instance in place and returns it.
    pub fn populate(&self, instance: &Instance) -> std::result::Result<Instance, GenerationError> {
        let mut session = self.session();
        session
            .populate_root(instance)
            .map_err(|source| GenerationError::Initialization {
                type_ref: TypeRef::named(instance.type_key()),
                source,
            })?;
        Ok(instance.clone())
    }

    fn session(&self) -> Session<'_> {
        Session {
            config: &self.config,
            cache: &self.cache,
            path: InstantiationPath::new(),
        }
    }
}

/// State of one top-level call. The path is never shared between calls.
pub(crate) struct Session<'g> {
    pub(crate) config: &'g Configuration,
    cache: &'g InstanceCache,
    pub(crate) path: InstantiationPath,
}

impl<'g> Session<'g> {
    fn generate(&mut self, type_ref: &TypeRef, populate: bool) -> Result<Value> {
        match type_ref {
            TypeRef::Named { key } if populate => self.retrieve(key),
            TypeRef::Named { key } => self.initialize(key, false),
            other => self.resolve_value(other, &[]),
        }
    }

    fn populate_root(&mut self, instance: &Instance) -> Result<()> {
        debug!(type_key = %instance.type_key(), "populating existing instance");
        self.path.enter(instance.type_key().clone());
        let populated = self.populate_fields(instance);
        self.path.exit();
        populated
    }

    /// Goes through the cache when it is enabled for the type.
    fn retrieve(&mut self, key: &TypeKey) -> Result<Value> {
        if self.config.use_cache(key) {
            let cache = self.cache;
            cache.get_or_retrieve(key, || self.initialize(key, true))
        } else {
            self.initialize(key, true)
        }
    }

    fn initialize(&mut self, key: &TypeKey, populate: bool) -> Result<Value> {
        if self.path.contains(key) {
            info!(type_key = %key, "cyclic dependency detected, skipping population");
            return Ok(Value::Null);
        }

        debug!(type_key = %key, "initializing");
        let config = self.config;
        let descriptor = config
            .types()
            .get(key)
            .ok_or_else(|| InstantiationError::UnknownType(key.clone()))?;

        if descriptor.is_abstract() {
            let value = self.resolve_abstract(key, populate)?;
            self.remember(key, &value, populate);
            return Ok(value);
        }

        let value = match descriptor {
            TypeDescriptor::Enum(descriptor) => return Ok(first_variant(descriptor)),
            _ => {
                if let Some(source) = config.defaults().get(&TypeRef::named(key)) {
                    debug!(type_key = %key, "found default value");
                    let value = source.value();
                    self.remember(key, &value, populate);
                    return Ok(value);
                }
                self.instantiate(descriptor)?
            }
        };

        self.remember(key, &value, populate);
        if let Value::Object(instance) = &value {
            self.path.enter(key.clone());
            let populated = if populate {
                self.populate_fields(instance)
            } else {
                Ok(())
            };
            self.path.exit();
            populated?;
        }
        Ok(value)
    }

    /// Stores a fresh instance before its fields are walked, so references
    /// back to it resolve to the same instance.
    fn remember(&self, key: &TypeKey, value: &Value, populate: bool) {
        if populate && self.config.use_cache(key) {
            self.cache.put(key, value);
        }
    }

    fn resolve_abstract(&mut self, key: &TypeKey, populate: bool) -> Result<Value> {
        let config = self.config;
        match config.types().concrete_for(key) {
            Some(concrete) => {
                debug!(abstract_type = %key, concrete_type = %concrete, "resolved mapping");
                self.initialize(concrete, populate)
            }
            None => self.unmapped(key),
        }
    }

    pub(crate) fn unmapped(&self, key: &TypeKey) -> Result<Value> {
        if !self.config.proxy_unmapped_interfaces() {
            return Err(InstantiationError::UnmappedInterface(key.clone()));
        }
        debug!(type_key = %key, "creating stand-in for unmapped type");
        let stand_in = StandInFactory::new(self.config).create(std::slice::from_ref(key))?;
        Ok(Value::StandIn(stand_in))
    }

    fn instantiate(&self, descriptor: &TypeDescriptor) -> Result<Value> {
        match descriptor {
            TypeDescriptor::Record(record) => self.construct(record),
            TypeDescriptor::Container(container) => Ok(Value::Container(Container::new(
                container.key.clone(),
                container.shape,
            ))),
            TypeDescriptor::Enum(descriptor) => Ok(first_variant(descriptor)),
            TypeDescriptor::Interface(interface) => Err(InstantiationError::NotConstructible(
                TypeRef::named(&interface.key),
            )),
        }
    }

    fn construct(&self, record: &RecordDescriptor) -> Result<Value> {
        if let Constructor::Unavailable = record.constructor {
            return Err(InstantiationError::NoConstructor(record.key.clone()));
        }
        let fields = self.config.types().all_fields(&record.key)?;
        let instance = Instance::new(record.key.clone(), &fields);
        if let Constructor::Custom(hook) = &record.constructor {
            hook(&instance).map_err(|message| InstantiationError::ConstructorFailed {
                type_key: record.key.clone(),
                message,
            })?;
        }
        Ok(Value::Object(instance))
    }

    fn populate_fields(&mut self, instance: &Instance) -> Result<()> {
        let fields = self.config.types().all_fields(instance.type_key())?;
        for field in fields {
            if field.transient {
                continue;
            }
            self.path
                .push_field(FieldMember::new(field.clone(), instance.clone()));
            if field.immutable {
                self.fill_immutable(instance, &field);
            } else {
                self.populate_field(instance, &field);
            }
            self.path.pop_field();
        }
        Ok(())
    }

    fn populate_field(&mut self, instance: &Instance, field: &FieldDescriptor) {
        let config = self.config;
        let members = self.path.snapshot();
        let ruled = FieldContext::new(&members).and_then(|ctx| {
            config
                .rules()
                .find_match(&field.type_ref, &ctx)
                .map(|rule| rule.value_for(&ctx))
        });

        let resolved = match ruled {
            Some(value) => Ok(value),
            None => self.resolve_value(&field.type_ref, &members),
        };

        match resolved {
            Ok(value) => {
                if let Err(err) = instance.assign(field, value) {
                    error!(
                        type_key = %instance.type_key(),
                        field = %field.name,
                        error = %err,
                        "failed to assign field"
                    );
                }
            }
            Err(err) if err.is_recoverable() => {
                info!(
                    type_key = %instance.type_key(),
                    field = %field.name,
                    field_type = %field.type_ref,
                    error = %err,
                    "could not initialize field"
                );
            }
            Err(err) => {
                warn!(
                    type_key = %instance.type_key(),
                    field = %field.name,
                    field_type = %field.type_ref,
                    error = %err,
                    "failed to instantiate field"
                );
            }
        }
    }

    /// Immutable fields are never replaced; containers they hold are filled
    /// in place.
    fn fill_immutable(&mut self, instance: &Instance, field: &FieldDescriptor) {
        let TypeRef::Container { args, .. } = &field.type_ref else {
            return;
        };
        match instance.get(&field.name) {
            Some(Value::Container(container)) => {
                let members = self.path.snapshot();
                self.populate_container(&container, args, &members);
            }
            _ => debug!(
                type_key = %instance.type_key(),
                field = %field.name,
                "immutable container field holds no container"
            ),
        }
    }

    /// Default-or-recurse resolution shared by fields, elements, and
    /// top-level requests for non-record types.
    pub(crate) fn resolve_value(
        &mut self,
        type_ref: &TypeRef,
        members: &[FieldMember],
    ) -> Result<Value> {
        if let TypeRef::Container { container, args } = type_ref {
            return self.instantiate_container(container, args, members);
        }

        let config = self.config;
        if let Some(source) = config.defaults().get(type_ref) {
            debug!(value_type = %type_ref, "using default value");
            return Ok(source.resolve(FieldContext::new(members).as_ref()));
        }

        match type_ref {
            TypeRef::Named { key } => self.retrieve(key),
            TypeRef::Class => {
                debug!("type values are never generated");
                Ok(Value::Null)
            }
            other => Err(InstantiationError::NotConstructible(other.clone())),
        }
    }

    fn instantiate_container(
        &mut self,
        key: &TypeKey,
        args: &[TypeRef],
        members: &[FieldMember],
    ) -> Result<Value> {
        let value = self.new_container(key)?;
        if let Value::Container(container) = &value {
            self.populate_container(container, args, members);
        }
        Ok(value)
    }

    fn new_container(&self, key: &TypeKey) -> Result<Value> {
        let types = self.config.types();
        let descriptor = types
            .container(key)
            .ok_or_else(|| InstantiationError::UnknownType(key.clone()))?;
        if !descriptor.is_abstract {
            return Ok(Value::Container(Container::new(
                descriptor.key.clone(),
                descriptor.shape,
            )));
        }

        match types.concrete_for(key) {
            Some(concrete) => {
                let target = types
                    .container(concrete)
                    .filter(|target| !target.is_abstract)
                    .ok_or_else(|| InstantiationError::NotConstructible(TypeRef::raw(concrete)))?;
                debug!(abstract_type = %key, concrete_type = %concrete, "resolved container mapping");
                Ok(Value::Container(Container::new(
                    target.key.clone(),
                    target.shape,
                )))
            }
            None => self.unmapped(key),
        }
    }
}

fn first_variant(descriptor: &EnumDescriptor) -> Value {
    descriptor
        .variants
        .first()
        .map(|variant| {
            Value::Enum(EnumValue {
                type_key: descriptor.key.clone(),
                variant: variant.clone(),
            })
        })
        .unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixtura_core::{EnumDescriptor, RecordDescriptor, Scalar};

    fn generator() -> Generator {
        let mut config = Configuration::new();
        config
            .register(
                RecordDescriptor::new("Node")
                    .field("label", TypeRef::Text)
                    .field("next", TypeRef::named("Node"))
                    .field("weight", TypeRef::primitive(Scalar::Int)),
            )
            .expect("node");
        config
            .register(EnumDescriptor::new("Color", ["Red", "Green"]))
            .expect("color");
        config
            .register(EnumDescriptor::new("Empty", Vec::<String>::new()))
            .expect("empty");
        Generator::with_configuration(config)
    }

    #[test]
    fn unpopulated_get_keeps_language_defaults() {
        let generator = generator();
        let node = generator.get_with("Node", false).expect("node");
        let node = node.as_instance().expect("instance");
        assert_eq!(node.get("label"), Some(Value::Null));
        assert_eq!(node.get("weight"), Some(Value::Int(0)));
        assert!(generator.cache().is_empty());
    }

    #[test]
    fn enums_yield_first_variant_or_null() {
        let generator = generator();
        let color = generator.get("Color").expect("color");
        assert_eq!(color.as_enum().map(|value| value.variant.as_str()), Some("Red"));
        assert!(generator.get("Empty").expect("empty").is_null());
    }

    #[test]
    fn class_and_scalar_requests() {
        let generator = generator();
        assert!(generator.get(TypeRef::Class).expect("class").is_null());
        assert_eq!(generator.get(TypeRef::Text).expect("text"), Value::from(""));
        assert_eq!(
            generator.get(TypeRef::primitive(Scalar::Int)).expect("int"),
            Value::Int(1)
        );
    }

    #[test]
    fn unknown_types_are_reported() {
        let generator = generator();
        let err = generator.get("Ghost").expect_err("unknown");
        assert!(matches!(
            err,
            GenerationError::Initialization {
                source: InstantiationError::UnknownType(_),
                ..
            }
        ));
    }

    #[test]
    fn configuration_mut_copies_shared_configuration() {
        let original = generator();
        let mut copy = original.clone();
        copy.configuration_mut().set_cache_enabled(false);
        assert!(original.configuration().cache_enabled());
        assert!(!copy.configuration().cache_enabled());
    }
}
