use std::hash::Hash;
use std::hash::Hasher;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use lru::LruCache;

use crate::data::SchemaRef;

pub const DEFAULT_SCHEMA_CACHE_SIZE: NonZeroUsize = match NonZeroUsize::new(16) {
    Some(v) => v,
    None => unreachable!(),
};

/// Cache key comparing schemas by allocation, not by content. Holding the `Arc` keeps the
/// address from being reused while the entry lives.
struct SchemaKey(SchemaRef);

impl PartialEq for SchemaKey {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for SchemaKey {}

impl Hash for SchemaKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

/// Input schema to derived schema, bounded with least-recently-used eviction.
pub struct SchemaCache {
    cache: Mutex<LruCache<SchemaKey, SchemaRef>>,
}

impl SchemaCache {
    pub fn new(cap: NonZeroUsize) -> Self {
        SchemaCache {
            cache: Mutex::new(LruCache::new(cap)),
        }
    }

    // every operation is a single map call, so a poisoned map is still consistent
    fn lock(&self) -> MutexGuard<'_, LruCache<SchemaKey, SchemaRef>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, schema: &SchemaRef) -> Option<SchemaRef> {
        self.lock().get(&SchemaKey(schema.clone())).cloned()
    }

    pub fn put(&self, schema: SchemaRef, updated: SchemaRef) {
        self.lock().put(SchemaKey(schema), updated);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Default for SchemaCache {
    fn default() -> Self {
        Self::new(DEFAULT_SCHEMA_CACHE_SIZE)
    }
}
