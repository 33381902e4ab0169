use dashmap::DashMap;
use tracing::debug;

use fixtura_core::{TypeKey, Value};

/// One instance per type, owned by a single generator and shared by every
/// pass it runs.
#[derive(Debug, Default)]
pub struct InstanceCache {
    entries: DashMap<TypeKey, Value>,
}

impl InstanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &TypeKey) -> Option<Value> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Stores a value unless one is already cached. Nulls are not stored.
    pub fn put(&self, key: &TypeKey, value: &Value) {
        if value.is_null() {
            return;
        }
        debug!(type_key = %key, "adding to cache");
        self.entries
            .entry(key.clone())
            .or_insert_with(|| value.clone());
    }

    /// Returns the cached value, or computes and stores one.
    ///
    /// The computation runs without holding any lock, so it may recurse into
    /// the cache. When another writer stored a value in the meantime, that
    /// value is returned instead.
    pub fn get_or_retrieve<E>(
        &self,
        key: &TypeKey,
        retrieve: impl FnOnce() -> Result<Value, E>,
    ) -> Result<Value, E> {
        if let Some(value) = self.get(key) {
            debug!(type_key = %key, "found in cache");
            return Ok(value);
        }

        debug!(type_key = %key, "not in cache, retrieving");
        let value = retrieve()?;
        if value.is_null() {
            return Ok(value);
        }
        let entry = self.entries.entry(key.clone()).or_insert(value);
        Ok(entry.value().clone())
    }

    pub fn contains(&self, key: &TypeKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&self, key: &TypeKey) -> Option<Value> {
        self.entries.remove(key).map(|(_, value)| value)
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retrieves_once_and_skips_nulls() {
        let cache = InstanceCache::new();
        let key = TypeKey::from("Counter");
        let mut calls = 0;

        let first = cache
            .get_or_retrieve::<()>(&key, || {
                calls += 1;
                Ok(Value::Int(7))
            })
            .expect("first");
        let second = cache
            .get_or_retrieve::<()>(&key, || {
                calls += 1;
                Ok(Value::Int(8))
            })
            .expect("second");
        assert_eq!(first, Value::Int(7));
        assert_eq!(second, Value::Int(7));
        assert_eq!(calls, 1);

        let missing = TypeKey::from("Missing");
        let value = cache
            .get_or_retrieve::<()>(&missing, || Ok(Value::Null))
            .expect("null");
        assert!(value.is_null());
        assert!(!cache.contains(&missing));
    }

    #[test]
    fn put_keeps_the_first_value() {
        let cache = InstanceCache::new();
        let key = TypeKey::from("Shared");
        cache.put(&key, &Value::from("first"));
        cache.put(&key, &Value::from("second"));
        assert_eq!(cache.get(&key), Some(Value::from("first")));
    }

    #[test]
    fn first_writer_wins_after_retrieve() {
        let cache = InstanceCache::new();
        let key = TypeKey::from("Shared");
        let value = cache
            .get_or_retrieve::<()>(&key, || {
                cache.put(&key, &Value::from("early"));
                Ok(Value::from("late"))
            })
            .expect("retrieve");
        assert_eq!(value, Value::from("early"));
        assert_eq!(cache.len(), 1);
    }
}
