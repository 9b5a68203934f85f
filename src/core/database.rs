use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::debug;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::types::ScalarValue;
use crate::index::secondary::{IndexStats, SecondaryIndex};
use crate::ingest::csv::CsvLoader;
use crate::query::ast::Query;
use crate::query::planner::{QueryPlanner, ScanPlan};
use crate::schema::schema::FieldId;
use crate::search::executor::ScanExecutor;
use crate::storage::proxy::RecordRef;
use crate::storage::record_store::RecordStore;

/// Snapshot of the session's shape
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseStats {
    pub records: usize,
    pub worker_threads: usize,
    pub indexes: Vec<IndexStats>,
}

/// Query session over one immutable collision store
pub struct CollisionDatabase {
    config: Config,
    executor: ScanExecutor,  // owns the store handle
    indexes: RwLock<HashMap<FieldId, Arc<SecondaryIndex>>>,
}

impl CollisionDatabase {
    /// Open a session over a finalized store and build the configured indexes
    pub fn open(store: RecordStore, config: Config) -> Result<Self> {
        let store = Arc::new(store);
        let executor = ScanExecutor::new(store, &config)?;

        let db = CollisionDatabase {
            indexes: RwLock::new(HashMap::new()),
            executor,
            config,
        };
        for field in db.config.indexed_fields.clone() {
            db.ensure_index(field)?;
        }
        Ok(db)
    }

    /// Load the CSV export at `path` and open a session over it
    pub fn open_csv<P: AsRef<Path>>(path: P, config: Config) -> Result<Self> {
        let store = CsvLoader::new(&config)?.load(path)?;
        Self::open(store, config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &RecordStore {
        self.executor.store()
    }

    pub fn len(&self) -> usize {
        self.store().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store().is_empty()
    }

    /// Build the index on `field` unless it already exists
    pub fn ensure_index(&self, field: FieldId) -> Result<Arc<SecondaryIndex>> {
        if let Some(index) = self.indexes.read().get(&field) {
            return Ok(index.clone());
        }

        // Built outside the lock; a concurrent builder of the same field
        // produces an identical index, first insert wins.
        let built = Arc::new(SecondaryIndex::build(self.store(), field)?);
        let mut indexes = self.indexes.write();
        Ok(indexes.entry(field).or_insert(built).clone())
    }

    pub fn index(&self, field: FieldId) -> Option<Arc<SecondaryIndex>> {
        self.indexes.read().get(&field).cloned()
    }

    pub fn indexed_fields(&self) -> Vec<FieldId> {
        let mut fields: Vec<FieldId> = self.indexes.read().keys().copied().collect();
        fields.sort();
        fields
    }

    /// Indices holding `value` in an indexed field; `None` if `field` has
    /// no index
    pub fn lookup(&self, field: FieldId, value: &ScalarValue) -> Option<Vec<usize>> {
        self.index(field).map(|index| index.lookup(value).to_vec())
    }

    /// Planned sequential execution
    pub fn search(&self, query: &Query) -> Vec<RecordRef<'_>> {
        let hits = self.execute(query, false);
        self.executor.to_records(&hits)
    }

    /// Planned execution with the full-scan path run in parallel
    pub fn search_parallel(&self, query: &Query) -> Vec<RecordRef<'_>> {
        let hits = self.execute(query, true);
        self.executor.to_records(&hits)
    }

    /// Sequential full scan, never consulting an index
    pub fn scan(&self, query: &Query) -> Vec<RecordRef<'_>> {
        self.executor.search(query)
    }

    /// Parallel full scan, never consulting an index
    pub fn scan_parallel(&self, query: &Query) -> Vec<RecordRef<'_>> {
        self.executor.search_parallel(query)
    }

    pub fn plan(&self, query: &Query) -> ScanPlan {
        QueryPlanner::plan(query, &self.indexed_fields())
    }

    fn execute(&self, query: &Query, parallel: bool) -> Vec<usize> {
        let start = Instant::now();
        match self.plan(query) {
            ScanPlan::IndexSeek { field, key, residual } => {
                let hits = match self.index(field) {
                    Some(index) => self.executor.filter_candidates(&residual, index.lookup(&key)),
                    None => self.full_scan(query, parallel),
                };
                debug!(
                    field = field.name(),
                    residual = residual.len(),
                    hits = hits.len(),
                    took_us = start.elapsed().as_micros() as u64,
                    "index seek"
                );
                hits
            }
            ScanPlan::FullScan => self.full_scan(query, parallel),
        }
    }

    fn full_scan(&self, query: &Query, parallel: bool) -> Vec<usize> {
        if parallel {
            self.executor.search_indices_parallel(query)
        } else {
            self.executor.search_indices(query)
        }
    }

    pub fn stats(&self) -> DatabaseStats {
        let mut indexes: Vec<IndexStats> = self.indexes.read().values().map(|i| i.stats()).collect();
        indexes.sort_by_key(|s| s.field);
        DatabaseStats {
            records: self.len(),
            worker_threads: self.executor.workers(),
            indexes,
        }
    }
}
