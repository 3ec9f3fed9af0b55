//! Lookup table from arbitrary keys to scopes.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{PoisonError, RwLock};

use crate::context::Context;

/// Thread-safe map from a key to a [`Context`].
///
/// Entries are never evicted and are not tied to the referenced scope's
/// status; a stopped scope stays registered until replaced.
#[derive(Debug)]
pub struct ContextRegistry<K> {
    entries: RwLock<HashMap<K, Context>>,
}

impl<K> Default for ContextRegistry<K> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash> ContextRegistry<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &K) -> Option<Context> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Register `context` under `key`, returning the scope it replaced
    pub fn set(&self, key: K, context: Context) -> Option<Context> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, context)
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
}
