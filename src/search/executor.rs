use std::ops::Range;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;
use crate::core::config::{Config, EvaluationMode};
use crate::core::error::Result;
use crate::parallel::scanner::ParallelScanner;
use crate::query::ast::Query;
use crate::query::matcher;
use crate::storage::proxy::RecordRef;
use crate::storage::record_store::RecordStore;

/// Evaluate `query` over `range`, returning matching indices ascending
pub fn scan_range(
    store: &RecordStore,
    query: &Query,
    range: Range<usize>,
    mode: EvaluationMode,
) -> Vec<usize> {
    match mode {
        EvaluationMode::RowAtATime => range.filter(|&i| query.matches(store, i)).collect(),
        EvaluationMode::Mask => {
            let start = range.start;
            let mut mask = vec![true; range.len()];

            for predicate in query.predicates() {
                let column = store.column(predicate.field());
                matcher::and_mask(predicate, column, range.clone(), &mut mask);
                if !mask.contains(&true) {
                    return Vec::new();
                }
            }

            mask.iter()
                .enumerate()
                .filter(|(_, hit)| **hit)
                .map(|(offset, _)| start + offset)
                .collect()
        }
    }
}

/// Full-scan query execution over one immutable store
pub struct ScanExecutor {
    store: Arc<RecordStore>,
    scanner: ParallelScanner,
    evaluation: EvaluationMode,
}

impl ScanExecutor {
    pub fn new(store: Arc<RecordStore>, config: &Config) -> Result<Self> {
        Ok(ScanExecutor {
            store,
            scanner: ParallelScanner::new(config.worker_threads)?,
            evaluation: config.evaluation,
        })
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn workers(&self) -> usize {
        self.scanner.workers()
    }

    pub fn evaluation(&self) -> EvaluationMode {
        self.evaluation
    }

    /// Sequential scan: ascending indices whose record satisfies `query`
    pub fn search_indices(&self, query: &Query) -> Vec<usize> {
        let start = Instant::now();
        let hits = scan_range(&self.store, query, 0..self.store.len(), self.evaluation);

        debug!(
            rows = self.store.len(),
            predicates = query.len(),
            hits = hits.len(),
            took_us = start.elapsed().as_micros() as u64,
            "sequential scan"
        );
        hits
    }

    /// Chunked parallel scan; same indices, same order as `search_indices`
    pub fn search_indices_parallel(&self, query: &Query) -> Vec<usize> {
        let start = Instant::now();
        let store: &RecordStore = &self.store;
        let mode = self.evaluation;
        let hits = self.scanner.scan(store.len(), |range| scan_range(store, query, range, mode));

        debug!(
            rows = store.len(),
            predicates = query.len(),
            workers = self.scanner.workers(),
            hits = hits.len(),
            took_us = start.elapsed().as_micros() as u64,
            "parallel scan"
        );
        hits
    }

    /// Keep the candidates that satisfy `query`, preserving candidate order
    pub fn filter_candidates(&self, query: &Query, candidates: &[usize]) -> Vec<usize> {
        let store: &RecordStore = &self.store;
        candidates
            .iter()
            .copied()
            .filter(|&i| i < store.len() && query.matches(store, i))
            .collect()
    }

    pub fn search(&self, query: &Query) -> Vec<RecordRef<'_>> {
        self.to_records(&self.search_indices(query))
    }

    pub fn search_parallel(&self, query: &Query) -> Vec<RecordRef<'_>> {
        self.to_records(&self.search_indices_parallel(query))
    }

    pub fn to_records(&self, indices: &[usize]) -> Vec<RecordRef<'_>> {
        indices
            .iter()
            .filter_map(|&i| self.store.record(i))
            .collect()
    }
}
