use serde::{Deserialize, Serialize};
use crate::core::error::Result;
use crate::schema::schema::FieldId;

/// How a scan evaluates the predicate conjunction over a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvaluationMode {
    /// Full conjunction per row, short-circuiting on the first miss
    RowAtATime,
    /// One predicate at a time across the chunk, AND-ed into a boolean mask
    Mask,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub worker_threads: usize,                  // Parallel scan pool size
    pub evaluation: EvaluationMode,
    pub indexed_fields: Vec<FieldId>,           // Secondary indexes built on open
    pub csv_chunk_bytes: usize,                 // Target size of one parallel CSV conversion batch
}

impl Default for Config {
    fn default() -> Self {
        Config {
            worker_threads: num_cpus::get().max(1),
            evaluation: EvaluationMode::Mask,
            indexed_fields: vec![FieldId::Borough],
            csv_chunk_bytes: 4 * 1024 * 1024,    // 4MB
        }
    }
}

impl Config {
    /// Parse a JSON config; missing keys take their defaults
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text)?;
        Ok(config.normalized())
    }

    pub fn with_worker_threads(mut self, workers: usize) -> Self {
        self.worker_threads = workers.max(1);
        self
    }

    pub fn with_evaluation(mut self, evaluation: EvaluationMode) -> Self {
        self.evaluation = evaluation;
        self
    }

    pub fn with_indexed_fields(mut self, fields: Vec<FieldId>) -> Self {
        self.indexed_fields = fields;
        self
    }

    fn normalized(mut self) -> Self {
        self.worker_threads = self.worker_threads.max(1);
        self.csv_chunk_bytes = self.csv_chunk_bytes.max(1);
        self
    }
}
