// 🗃️ Dataset Cache - load once per session, share read-only afterwards
// Invalidation rule: process restart. There is no refresh.

use crate::loader::{load, DatasetSource};
use crate::record::Record;
use anyhow::Result;
use log::debug;
use std::sync::{Arc, OnceLock};

pub struct DatasetCache {
    source: DatasetSource,
    records: OnceLock<Arc<Vec<Record>>>,
}

impl DatasetCache {
    pub fn new(source: DatasetSource) -> Self {
        DatasetCache {
            source,
            records: OnceLock::new(),
        }
    }

    /// Cache that starts out populated (no load ever happens)
    pub fn with_records(source: DatasetSource, records: Vec<Record>) -> Self {
        let cache = DatasetCache::new(source);
        let _ = cache.records.set(Arc::new(records));
        cache
    }

    pub fn source(&self) -> &DatasetSource {
        &self.source
    }

    pub fn is_loaded(&self) -> bool {
        self.records.get().is_some()
    }

    /// Return the cached records, loading them on first use.
    /// A failed load leaves the cache empty so the next call tries again.
    pub fn get(&self) -> Result<Arc<Vec<Record>>> {
        if let Some(records) = self.records.get() {
            debug!("Dataset cache hit ({} records)", records.len());
            return Ok(Arc::clone(records));
        }

        let loaded = Arc::new(load(&self.source)?);
        let stored = self.records.get_or_init(|| loaded);
        Ok(Arc::clone(stored))
    }
}

// ============================================================================
// TESTS
// ============================================================================
