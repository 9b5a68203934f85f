use std::collections::HashMap;
use std::hash::Hash;
use std::time::Instant;
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use tracing::info;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{ScalarKind, ScalarValue};
use crate::schema::schema::FieldId;
use crate::storage::column::Column;
use crate::storage::record_store::RecordStore;

/// Value -> ascending record indices, one map per indexable kind
#[derive(Debug, Clone)]
enum Buckets {
    Unsigned(HashMap<u64, Vec<usize>>),
    Text(HashMap<String, Vec<usize>>),
    Date(HashMap<NaiveDate, Vec<usize>>),
    Time(HashMap<NaiveTime, Vec<usize>>),
}

fn bucketize<K: Copy + Eq + Hash>(values: &[Option<K>]) -> HashMap<K, Vec<usize>> {
    let mut buckets: HashMap<K, Vec<usize>> = HashMap::new();
    for (index, value) in values.iter().enumerate() {
        if let Some(key) = value {
            buckets.entry(*key).or_default().push(index);
        }
    }
    buckets
}

fn bucketize_text(values: &[Option<String>]) -> HashMap<String, Vec<usize>> {
    let mut buckets: HashMap<String, Vec<usize>> = HashMap::new();
    for (index, value) in values.iter().enumerate() {
        if let Some(key) = value {
            // Only allocate a key the first time a value is seen
            match buckets.get_mut(key.as_str()) {
                Some(bucket) => bucket.push(index),
                None => {
                    buckets.insert(key.clone(), vec![index]);
                }
            }
        }
    }
    buckets
}

/// Equality index over one field of an immutable store.
///
/// Built by a single ascending pass, so every bucket is sorted. The index is
/// a snapshot of the store at build time; it is never updated afterwards.
#[derive(Debug, Clone)]
pub struct SecondaryIndex {
    field: FieldId,
    buckets: Buckets,
    indexed_rows: usize,
}

/// Shape of a built index
#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    pub field: FieldId,
    pub distinct_values: usize,
    pub indexed_rows: usize,
    pub largest_bucket: usize,
}

impl SecondaryIndex {
    pub fn build(store: &RecordStore, field: FieldId) -> Result<Self> {
        let start = Instant::now();
        let buckets = match store.column(field) {
            Column::Unsigned(values) => Buckets::Unsigned(bucketize(values)),
            Column::Text(values) => Buckets::Text(bucketize_text(values)),
            Column::Date(values) => Buckets::Date(bucketize(values)),
            Column::Time(values) => Buckets::Time(bucketize(values)),
            Column::Numeric(_) => {
                return Err(Error::new(
                    ErrorKind::UnsupportedOperator,
                    format!("field '{}' is {} and cannot be indexed", field, ScalarKind::Numeric)
                ));
            }
        };

        let index = SecondaryIndex {
            field,
            indexed_rows: store.column(field).present_count(),
            buckets,
        };

        info!(
            field = field.name(),
            distinct = index.bucket_count(),
            rows = index.indexed_rows,
            took_ms = start.elapsed().as_millis() as u64,
            "secondary index built"
        );
        Ok(index)
    }

    pub fn field(&self) -> FieldId {
        self.field
    }

    /// Ascending indices holding exactly `value`; empty when there is no
    /// bucket (including operands of another kind).
    pub fn lookup(&self, value: &ScalarValue) -> &[usize] {
        let bucket = match (&self.buckets, value) {
            (Buckets::Unsigned(map), ScalarValue::Unsigned(v)) => map.get(v),
            (Buckets::Text(map), ScalarValue::Text(v)) => map.get(v.as_str()),
            (Buckets::Date(map), ScalarValue::Date(v)) => map.get(v),
            (Buckets::Time(map), ScalarValue::Time(v)) => map.get(v),
            _ => None,
        };
        bucket.map(Vec::as_slice).unwrap_or(&[])
    }

    /// Text lookup without building an owned operand
    pub fn lookup_text(&self, value: &str) -> &[usize] {
        match &self.buckets {
            Buckets::Text(map) => map.get(value).map(Vec::as_slice).unwrap_or(&[]),
            _ => &[],
        }
    }

    pub fn bucket_count(&self) -> usize {
        match &self.buckets {
            Buckets::Unsigned(map) => map.len(),
            Buckets::Text(map) => map.len(),
            Buckets::Date(map) => map.len(),
            Buckets::Time(map) => map.len(),
        }
    }

    /// Rows where the indexed field is present
    pub fn indexed_rows(&self) -> usize {
        self.indexed_rows
    }

    /// Every indexed value with its bucket, in no particular order
    pub fn entries(&self) -> Vec<(ScalarValue, &[usize])> {
        match &self.buckets {
            Buckets::Unsigned(map) => map.iter().map(|(k, v)| (ScalarValue::Unsigned(*k), v.as_slice())).collect(),
            Buckets::Text(map) => map.iter().map(|(k, v)| (ScalarValue::Text(k.clone()), v.as_slice())).collect(),
            Buckets::Date(map) => map.iter().map(|(k, v)| (ScalarValue::Date(*k), v.as_slice())).collect(),
            Buckets::Time(map) => map.iter().map(|(k, v)| (ScalarValue::Time(*k), v.as_slice())).collect(),
        }
    }

    pub fn stats(&self) -> IndexStats {
        let largest_bucket = self.entries().iter().map(|(_, b)| b.len()).max().unwrap_or(0);
        IndexStats {
            field: self.field,
            distinct_values: self.bucket_count(),
            indexed_rows: self.indexed_rows,
            largest_bucket,
        }
    }
}
