use std::ops::Range;
use rayon::prelude::*;
use rayon::ThreadPool;
use crate::core::error::Result;

/// Split `[0, len)` into `workers` contiguous chunks of `len / workers`
/// rows each; the last chunk absorbs the remainder. Chunks may be empty
/// when there are more workers than rows.
pub fn partition(len: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.max(1);
    let chunk_size = len / workers;

    (0..workers)
        .map(|worker| {
            let start = worker * chunk_size;
            let end = if worker == workers - 1 { len } else { start + chunk_size };
            start..end
        })
        .collect()
}

/// Fixed-size worker pool for chunked scans.
/// Each chunk is evaluated into its own buffer; buffers are concatenated in
/// chunk order once every worker is done, so output order equals a
/// single-threaded ascending scan.
pub struct ParallelScanner {
    pool: ThreadPool,
    workers: usize,
}

impl ParallelScanner {
    pub fn new(workers: usize) -> Result<Self> {
        let workers = workers.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("crashscan-worker-{}", i))
            .build()?;

        Ok(ParallelScanner { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `scan_chunk` over every chunk of `[0, len)` and merge the
    /// per-chunk results in chunk order.
    pub fn scan<F>(&self, len: usize, scan_chunk: F) -> Vec<usize>
    where
        F: Fn(Range<usize>) -> Vec<usize> + Sync,
    {
        let chunks = partition(len, self.workers);

        // Indexed collect keeps chunk order; install() returns after all
        // chunks finish.
        let buffers: Vec<Vec<usize>> = self.pool.install(|| {
            chunks
                .into_par_iter()
                .map(|range| scan_chunk(range))
                .collect()
        });

        let total = buffers.iter().map(Vec::len).sum();
        let mut merged = Vec::with_capacity(total);
        for buffer in buffers {
            merged.extend(buffer);
        }
        merged
    }
}
