use crate::error::Error;
use crate::model::interface::Model;
use std::path::Path;
use std::sync::Arc;

pub type LoadFn<'a> = dyn Fn() -> Result<Arc<dyn Model>, Error> + 'a;

/// Process-wide store of loaded models, keyed by artifact path.
///
/// Loaded entries are never evicted. Implementations must run `load` at most once
/// per key, even when several callers ask for the same missing key at once.
pub trait ModelCache: Send + Sync {
    fn get(&self, key: &Path) -> Option<Arc<dyn Model>>;

    /// Returns the cached model for `key`, or runs `load` and stores its
    /// result. A failed load leaves no trace of `key`.
    fn get_or_try_insert(&self, key: &Path, load: &LoadFn<'_>) -> Result<Arc<dyn Model>, Error>;

    fn len(&self) -> usize;
}
