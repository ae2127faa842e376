use crate::config::ModelEntry;
use crate::error::Error;
use crate::library::logger::interface::Logger;
use crate::model::interface::{Model, ModelLoader};
use crate::model_registry::cache::interface::ModelCache;
use std::sync::Arc;
use std::time::Instant;

/// Static name -> artifact registry backed by a shared model cache.
pub struct ModelRegistry {
    entries: Vec<ModelEntry>,
    loader: Arc<dyn ModelLoader>,
    cache: Arc<dyn ModelCache>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ModelRegistry {
    pub fn new(
        entries: Vec<ModelEntry>,
        loader: Arc<dyn ModelLoader>,
        cache: Arc<dyn ModelCache>,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            entries,
            loader,
            cache,
            logger: logger.with_namespace("registry"),
        }
    }

    /// Display names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.name.as_str()).collect()
    }

    pub fn entry(&self, name: &str) -> Option<&ModelEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Model>, Error> {
        let entry = self.entry(name).ok_or_else(|| Error::ModelNotFound {
            name: name.to_string(),
            path: None,
        })?;

        if let Some(model) = self.cache.get(&entry.path) {
            return Ok(model);
        }

        if !entry.path.exists() {
            return Err(Error::ModelNotFound {
                name: entry.name.clone(),
                path: Some(entry.path.clone()),
            });
        }

        let load = || -> Result<Arc<dyn Model>, Error> {
            let _ = self.logger.info(&format!(
                "loading '{}' from {}",
                entry.name,
                entry.path.display()
            ));
            let started = Instant::now();

            let model = self.loader.load(&entry.path).map_err(|source| Error::ModelLoad {
                path: entry.path.clone(),
                source,
            })?;

            let _ = self.logger.info(&format!(
                "loaded '{}' in {:?}",
                entry.name,
                started.elapsed()
            ));
            Ok(model)
        };

        self.cache.get_or_try_insert(&entry.path, &load)
    }

    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }
}
