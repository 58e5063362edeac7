use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Result;
use tracing::debug;

/// Load-once-per-path cache for tables read from disk.
///
/// Entries live until `invalidate` or `clear` is called; file changes on disk are not
/// detected.
#[derive(Debug)]
pub struct TableCache<T> {
    entries: Mutex<HashMap<PathBuf, Arc<T>>>,
}

impl<T> Default for TableCache<T> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<T> TableCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load<F>(&self, path: &Path, loader: F) -> Result<Arc<T>>
    where
        F: FnOnce(&Path) -> Result<T>,
    {
        let key = cache_key(path);
        if let Some(hit) = self.lock().get(&key) {
            debug!(path = %key.display(), "table cache hit");
            return Ok(Arc::clone(hit));
        }

        debug!(path = %key.display(), "table cache miss");
        let value = Arc::new(loader(path)?);
        self.lock().insert(key, Arc::clone(&value));
        Ok(value)
    }

    pub fn get(&self, path: &Path) -> Option<Arc<T>> {
        self.lock().get(&cache_key(path)).cloned()
    }

    pub fn invalidate(&self, path: &Path) -> bool {
        self.lock().remove(&cache_key(path)).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, Arc<T>>> {
        // A panicking loader never holds the lock, so a poisoned map is still consistent.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn cache_key(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::path::Path;

    use super::TableCache;

    #[test]
    fn loads_once_until_invalidated() {
        let cache: TableCache<String> = TableCache::new();
        let calls = Cell::new(0);
        let path = Path::new("no/such/table.csv");
        let load = |_: &Path| {
            calls.set(calls.get() + 1);
            Ok::<_, anyhow::Error>("rows".to_string())
        };

        let first = cache.get_or_load(path, load).unwrap();
        let second = cache.get_or_load(path, load).unwrap();
        assert_eq!(calls.get(), 1);
        assert_eq!(first, second);

        assert!(cache.invalidate(path));
        assert!(!cache.invalidate(path));
        cache.get_or_load(path, load).unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn failed_loads_are_not_cached() {
        let cache: TableCache<u32> = TableCache::new();
        let path = Path::new("missing.csv");
        assert!(cache
            .get_or_load(path, |_| Err(anyhow::anyhow!("boom")))
            .is_err());
        assert!(cache.is_empty());
        assert_eq!(*cache.get_or_load(path, |_| Ok(7)).unwrap(), 7);
        cache.clear();
        assert!(cache.get(path).is_none());
    }
}
