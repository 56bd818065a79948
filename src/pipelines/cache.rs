use crate::error::{PipelineError, Result};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

pub trait ModelOptions {
    fn cache_key(&self) -> String;
}

// Cache stores WEAK references - models are freed when all pipelines using them drop.
type CacheStorage = HashMap<(TypeId, String), Box<dyn Any + Send + Sync>>;

pub struct ModelCache {
    cache: Arc<Mutex<CacheStorage>>,
}

impl ModelCache {
    pub fn new() -> Self {
        Self {
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, CacheStorage>> {
        self.cache
            .lock()
            .map_err(|_| PipelineError::Unexpected("Model cache lock poisoned".into()))
    }

    pub fn get_or_create<M, F>(&self, key: &str, loader: F) -> Result<Arc<M>>
    where
        M: Send + Sync + 'static,
        F: FnOnce() -> Result<M>,
    {
        let type_id = TypeId::of::<M>();
        let cache_key = (type_id, key.to_string());

        {
            let mut cache = self.lock()?;
            if let Some(boxed) = cache.get(&cache_key) {
                // Try to upgrade weak ref
                if let Some(weak) = boxed.downcast_ref::<Weak<M>>() {
                    if let Some(strong) = weak.upgrade() {
                        tracing::debug!(key, "reusing loaded model");
                        return Ok(strong);
                    }
                }
                // Weak ref dead, remove stale entry
                cache.remove(&cache_key);
            }
        }

        let model = Arc::new(loader()?);

        {
            let mut cache = self.lock()?;
            let weak: Weak<M> = Arc::downgrade(&model);
            cache.insert(cache_key, Box::new(weak));
        }

        Ok(model)
    }

    #[cfg(test)]
    pub fn clear(&self) {
        if let Ok(mut cache) = self.lock() {
            cache.clear();
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.lock().map(|cache| cache.len()).unwrap_or(0)
    }
}

impl Default for ModelCache {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_MODEL_CACHE: once_cell::sync::Lazy<ModelCache> =
    once_cell::sync::Lazy::new(ModelCache::new);

pub fn global_cache() -> &'static ModelCache {
    &GLOBAL_MODEL_CACHE
}
