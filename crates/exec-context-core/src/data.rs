//! Local key-value storage of a single scope.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Key-value map owned by a scope.
///
/// Cloning a `ScopeData` yields another handle to the same map. Passing the
/// same handle to several scopes makes them share storage; by default every
/// scope gets a fresh map.
#[derive(Debug, Clone, Default)]
pub struct ScopeData {
    entries: Arc<RwLock<HashMap<String, Value>>>,
}

impl ScopeData {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a map with initial entries (builder pattern)
    pub fn with(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    pub fn insert(&self, key: String, value: Value) -> Option<Value> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value)
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of all entries
    pub fn to_map(&self) -> HashMap<String, Value> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether two handles point at the same map
    pub fn is_shared_with(&self, other: &ScopeData) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }
}

impl<K, V> FromIterator<(K, V)> for ScopeData
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let entries = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect::<HashMap<_, _>>();
        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }
}
