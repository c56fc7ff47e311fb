//! Description memoization.
//!
//! One process-wide namespace keyed by `{Type}_{id}`. Invalidation is
//! coarse: any tracked write clears everything, which keeps the single
//! threaded authoring flow race-free without locking.

use std::cell::RefCell;

use ahash::AHashMap;

/// Key-to-label cache consulted before recomputing a description.
pub trait DescriptionCache {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn clear(&self);
}

/// In-memory cache used by the authoring binaries and tests.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RefCell<AHashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl DescriptionCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

/// Cache key of one entity's description.
pub fn cache_key(type_name: &str, id: crate::core::types::Id) -> String {
    format!("{type_name}_{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_clear() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("Stage_1"), None);
        cache.set("Stage_1", "empty");
        assert_eq!(cache.get("Stage_1").as_deref(), Some("empty"));
        cache.clear();
        assert!(cache.is_empty());
    }
}
