use std::collections::{BTreeMap, BTreeSet};

use crate::descriptor::{
    CapabilityDescriptor, ContainerDescriptor, ContainerShape, FieldDescriptor, RecordDescriptor,
    TypeDescriptor,
};
use crate::error::{Error, Result};
use crate::types::{
    BTREE_MAP, BTREE_SET, COLLECTION, HASH_MAP, HASH_SET, LIST, MAP, SET, TypeKey, VEC, VEC_DEQUE,
};

/// Registered type descriptors plus the abstract-to-concrete type mapping.
///
/// Every registry starts with the built-in container types and the default
/// mappings `Collection -> Vec`, `List -> Vec`, `Set -> HashSet` and
/// `Map -> HashMap`.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    types: BTreeMap<TypeKey, TypeDescriptor>,
    mappings: BTreeMap<TypeKey, TypeKey>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        let mut types = BTreeMap::new();
        for descriptor in builtin_containers() {
            types.insert(descriptor.key.clone(), TypeDescriptor::Container(descriptor));
        }
        Self {
            types,
            mappings: default_mappings(),
        }
    }

    /// Registers a descriptor. Keys must be unique.
    pub fn register(&mut self, descriptor: impl Into<TypeDescriptor>) -> Result<()> {
        let descriptor = descriptor.into();
        let key = descriptor.key().clone();
        if self.types.contains_key(&key) {
            return Err(Error::InvalidDescriptor(format!(
                "type '{key}' is already registered"
            )));
        }
        if let TypeDescriptor::Record(record) = &descriptor {
            validate_record_fields(record)?;
        }
        self.types.insert(key, descriptor);
        Ok(())
    }

    pub fn get(&self, key: &TypeKey) -> Option<&TypeDescriptor> {
        self.types.get(key)
    }

    pub fn record(&self, key: &TypeKey) -> Option<&RecordDescriptor> {
        match self.types.get(key) {
            Some(TypeDescriptor::Record(record)) => Some(record),
            _ => None,
        }
    }

    pub fn container(&self, key: &TypeKey) -> Option<&ContainerDescriptor> {
        match self.types.get(key) {
            Some(TypeDescriptor::Container(container)) => Some(container),
            _ => None,
        }
    }

    pub fn contains(&self, key: &TypeKey) -> bool {
        self.types.contains_key(key)
    }

    pub fn is_abstract(&self, key: &TypeKey) -> bool {
        self.types
            .get(key)
            .map(TypeDescriptor::is_abstract)
            .unwrap_or(false)
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.values()
    }

    /// Maps an abstract type to a concrete implementation.
    ///
    /// The key must be abstract and the target must be constructible: a
    /// record for an interface, a concrete container of the same shape for an
    /// abstract container.
    pub fn map_abstract(
        &mut self,
        abstract_key: impl Into<TypeKey>,
        concrete_key: impl Into<TypeKey>,
    ) -> Result<()> {
        let abstract_key = abstract_key.into();
        let concrete_key = concrete_key.into();
        let abstract_desc = self
            .types
            .get(&abstract_key)
            .ok_or_else(|| Error::UnknownType(abstract_key.clone()))?;
        let concrete_desc = self
            .types
            .get(&concrete_key)
            .ok_or_else(|| Error::UnknownType(concrete_key.clone()))?;
        check_mapping(abstract_desc, concrete_desc)?;
        self.mappings.insert(abstract_key, concrete_key);
        Ok(())
    }

    pub fn unmap(&mut self, abstract_key: &TypeKey) -> Option<TypeKey> {
        self.mappings.remove(abstract_key)
    }

    /// Removes every mapping, including the built-in container defaults.
    pub fn clear_mappings(&mut self) {
        self.mappings.clear();
    }

    /// Restores the built-in container mappings and drops all others.
    pub fn reset_mappings(&mut self) {
        self.mappings = default_mappings();
    }

    pub fn concrete_for(&self, abstract_key: &TypeKey) -> Option<&TypeKey> {
        self.mappings.get(abstract_key)
    }

    pub fn mappings(&self) -> impl Iterator<Item = (&TypeKey, &TypeKey)> {
        self.mappings.iter()
    }

    /// Capabilities declared by an interface or abstract container.
    pub fn capabilities(&self, key: &TypeKey) -> Result<&[CapabilityDescriptor]> {
        self.types
            .get(key)
            .map(TypeDescriptor::capabilities)
            .ok_or_else(|| Error::UnknownType(key.clone()))
    }

    /// All fields of a record: its own first, then each ancestor's in turn.
    pub fn all_fields(&self, key: &TypeKey) -> Result<Vec<FieldDescriptor>> {
        let mut fields = Vec::new();
        let mut seen = BTreeSet::new();
        let mut current = Some(key.clone());
        while let Some(type_key) = current {
            if !seen.insert(type_key.clone()) {
                return Err(Error::InvalidRegistry(format!(
                    "inheritance cycle through '{type_key}'"
                )));
            }
            let record = match self.types.get(&type_key) {
                Some(TypeDescriptor::Record(record)) => record,
                Some(_) => {
                    return Err(Error::InvalidDescriptor(format!(
                        "'{type_key}' is not a record type"
                    )));
                }
                None => return Err(Error::UnknownType(type_key)),
            };
            fields.extend(record.fields.iter().cloned());
            current = record.parent.clone();
        }
        Ok(fields)
    }
}

pub(crate) fn check_mapping(
    abstract_desc: &TypeDescriptor,
    concrete_desc: &TypeDescriptor,
) -> Result<()> {
    let abstract_key = abstract_desc.key();
    let concrete_key = concrete_desc.key();
    if !abstract_desc.is_abstract() {
        return Err(Error::InvalidDescriptor(format!(
            "'{abstract_key}' is concrete and cannot be mapped"
        )));
    }
    match (abstract_desc, concrete_desc) {
        (TypeDescriptor::Interface(_), TypeDescriptor::Record(_)) => Ok(()),
        (TypeDescriptor::Container(abstract_container), TypeDescriptor::Container(concrete))
            if !concrete.is_abstract && concrete.shape == abstract_container.shape =>
        {
            Ok(())
        }
        _ => Err(Error::InvalidDescriptor(format!(
            "'{concrete_key}' cannot implement '{abstract_key}'"
        ))),
    }
}

fn validate_record_fields(record: &RecordDescriptor) -> Result<()> {
    let mut names = BTreeSet::new();
    for field in &record.fields {
        if field.name.is_empty() {
            return Err(Error::InvalidDescriptor(format!(
                "record '{}' has a field with an empty name",
                record.key
            )));
        }
        if field.declaring_type != record.key {
            return Err(Error::InvalidDescriptor(format!(
                "field '{}' is declared by '{}', not '{}'",
                field.name, field.declaring_type, record.key
            )));
        }
        if !names.insert(field.name.as_str()) {
            return Err(Error::InvalidDescriptor(format!(
                "record '{}' declares field '{}' twice",
                record.key, field.name
            )));
        }
    }
    Ok(())
}

fn builtin_containers() -> Vec<ContainerDescriptor> {
    vec![
        ContainerDescriptor::abstract_container(COLLECTION, ContainerShape::Sequence),
        ContainerDescriptor::abstract_container(LIST, ContainerShape::Sequence),
        ContainerDescriptor::abstract_container(SET, ContainerShape::Set),
        ContainerDescriptor::abstract_container(MAP, ContainerShape::Map),
        ContainerDescriptor::concrete(VEC, ContainerShape::Sequence),
        ContainerDescriptor::concrete(VEC_DEQUE, ContainerShape::Sequence),
        ContainerDescriptor::concrete(HASH_SET, ContainerShape::Set),
        ContainerDescriptor::concrete(BTREE_SET, ContainerShape::Set),
        ContainerDescriptor::concrete(HASH_MAP, ContainerShape::Map),
        ContainerDescriptor::concrete(BTREE_MAP, ContainerShape::Map),
    ]
}

fn default_mappings() -> BTreeMap<TypeKey, TypeKey> {
    [
        (COLLECTION, VEC),
        (LIST, VEC),
        (SET, HASH_SET),
        (MAP, HASH_MAP),
    ]
    .into_iter()
    .map(|(from, to)| (TypeKey::from(from), TypeKey::from(to)))
    .collect()
}
