use std::collections::BTreeSet;

use crate::descriptor::TypeDescriptor;
use crate::error::{Error, Result};
use crate::registry::{TypeRegistry, check_mapping};
use crate::types::{TypeKey, TypeRef};

/// Validate internal consistency of a type registry.
///
/// This checks:
/// - record parents exist and are records
/// - inheritance chains are acyclic
/// - field names are unique across a record hierarchy
/// - every referenced type is registered
/// - mapping keys are abstract and targets can implement them
pub fn validate_registry(registry: &TypeRegistry) -> Result<()> {
    for descriptor in registry.descriptors() {
        match descriptor {
            TypeDescriptor::Record(record) => {
                if let Some(parent) = &record.parent {
                    if registry.record(parent).is_none() {
                        return Err(Error::InvalidRegistry(format!(
                            "parent '{parent}' of '{}' is not a registered record",
                            record.key
                        )));
                    }
                }

                let fields = registry.all_fields(&record.key)?;
                let mut names = BTreeSet::new();
                for field in &fields {
                    if !names.insert(field.name.as_str()) {
                        return Err(Error::InvalidRegistry(format!(
                            "field '{}' appears more than once in the hierarchy of '{}'",
                            field.name, record.key
                        )));
                    }
                }

                for field in &record.fields {
                    check_reference(registry, &field.type_ref).map_err(|missing| {
                        Error::InvalidRegistry(format!(
                            "field '{}.{}' references unregistered type '{missing}'",
                            record.key, field.name
                        ))
                    })?;
                }
            }
            TypeDescriptor::Interface(_) | TypeDescriptor::Container(_) => {
                for capability in descriptor.capabilities() {
                    check_reference(registry, &capability.returns).map_err(|missing| {
                        Error::InvalidRegistry(format!(
                            "capability '{}.{}' returns unregistered type '{missing}'",
                            descriptor.key(),
                            capability.name
                        ))
                    })?;
                }
            }
            TypeDescriptor::Enum(_) => {}
        }
    }

    for (abstract_key, concrete_key) in registry.mappings() {
        let abstract_desc = registry
            .get(abstract_key)
            .ok_or_else(|| Error::UnknownType(abstract_key.clone()))?;
        let concrete_desc = registry
            .get(concrete_key)
            .ok_or_else(|| Error::UnknownType(concrete_key.clone()))?;
        check_mapping(abstract_desc, concrete_desc)
            .map_err(|err| Error::InvalidRegistry(format!("mapping {abstract_key}: {err}")))?;
    }

    Ok(())
}

/// Returns the first unregistered key referenced by `type_ref`.
fn check_reference(registry: &TypeRegistry, type_ref: &TypeRef) -> std::result::Result<(), TypeKey> {
    match type_ref {
        TypeRef::Named { key } => {
            if registry.contains(key) {
                Ok(())
            } else {
                Err(key.clone())
            }
        }
        TypeRef::Container { container, args } => {
            if registry.container(container).is_none() {
                return Err(container.clone());
            }
            args.iter()
                .try_for_each(|arg| check_reference(registry, arg))
        }
        TypeRef::Array { element } => check_reference(registry, element),
        _ => Ok(()),
    }
}
