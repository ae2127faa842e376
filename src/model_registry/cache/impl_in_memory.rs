use crate::error::Error;
use crate::model::interface::Model;
use crate::model_registry::cache::interface::{LoadFn, ModelCache};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

type Slot = Arc<Mutex<Option<Arc<dyn Model>>>>;

/// Each key owns a slot with its own lock: loads of one key are serialized
/// while loads of different keys run side by side.
///
/// Lock order is slot, then map. The map lock is never held while waiting on
/// a slot.
#[derive(Default)]
pub struct ModelCacheInMemory {
    slots: Mutex<HashMap<PathBuf, Slot>>,
}

impl ModelCacheInMemory {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, key: &Path) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.entry(key.to_path_buf()).or_default().clone()
    }

    fn is_registered(&self, key: &Path, slot: &Slot) -> bool {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current, slot))
    }
}

impl ModelCache for ModelCacheInMemory {
    fn get(&self, key: &Path) -> Option<Arc<dyn Model>> {
        let slot = self
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()?;

        let model = slot.lock().unwrap_or_else(PoisonError::into_inner).clone();
        model
    }

    fn get_or_try_insert(&self, key: &Path, load: &LoadFn<'_>) -> Result<Arc<dyn Model>, Error> {
        loop {
            let slot = self.slot(key);
            let mut entry = slot.lock().unwrap_or_else(PoisonError::into_inner);

            if let Some(model) = entry.as_ref() {
                return Ok(model.clone());
            }

            // dropped by a failed load while we waited
            if !self.is_registered(key, &slot) {
                continue;
            }

            match load() {
                Ok(model) => {
                    *entry = Some(model.clone());
                    return Ok(model);
                }
                Err(error) => {
                    self.slots
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .remove(key);
                    return Err(error);
                }
            }
        }
    }

    fn len(&self) -> usize {
        let slots: Vec<Slot> = self
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();

        slots
            .iter()
            .filter(|slot| {
                slot.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .is_some()
            })
            .count()
    }
}
