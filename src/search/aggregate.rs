use std::collections::HashMap;
use chrono::NaiveDate;
use serde::Serialize;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{ScalarKind, ScalarRef};
use crate::schema::schema::FieldId;
use crate::storage::proxy::RecordRef;

/// Descriptive statistics of one numeric or unsigned field over a result set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSummary {
    pub field: FieldId,
    pub rows: usize,      // Records examined
    pub present: usize,   // Records with a value
    pub sum: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

fn require_kind(field: FieldId, allowed: &[ScalarKind]) -> Result<()> {
    if allowed.contains(&field.kind()) {
        Ok(())
    } else {
        Err(Error::new(
            ErrorKind::TypeMismatch,
            format!("field '{}' is {}; expected one of {:?}", field, field.kind(), allowed)
        ))
    }
}

pub fn summarize(records: &[RecordRef<'_>], field: FieldId) -> Result<FieldSummary> {
    require_kind(field, &[ScalarKind::Numeric, ScalarKind::Unsigned])?;

    let mut present = 0;
    let mut sum = 0.0;
    let mut min: Option<f64> = None;
    let mut max: Option<f64> = None;

    for record in records {
        let value = match record.get(field) {
            Some(ScalarRef::Numeric(v)) => v,
            Some(ScalarRef::Unsigned(v)) => v as f64,
            _ => continue,
        };
        present += 1;
        sum += value;
        min = Some(min.map_or(value, |m| m.min(value)));
        max = Some(max.map_or(value, |m| m.max(value)));
    }

    Ok(FieldSummary {
        field,
        rows: records.len(),
        present,
        sum,
        min,
        max,
        mean: (present > 0).then(|| sum / present as f64),
    })
}

/// Occurrences of each text value, most frequent first (ties by value)
pub fn value_counts(records: &[RecordRef<'_>], field: FieldId) -> Result<Vec<(String, usize)>> {
    require_kind(field, &[ScalarKind::Text])?;

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        if let Some(ScalarRef::Text(value)) = record.get(field) {
            *counts.entry(value).or_insert(0) += 1;
        }
    }

    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    Ok(counts)
}

/// Earliest and latest crash date in the result set
pub fn date_span(records: &[RecordRef<'_>]) -> Option<(NaiveDate, NaiveDate)> {
    records
        .iter()
        .filter_map(|r| r.crash_date())
        .fold(None, |span, date| match span {
            None => Some((date, date)),
            Some((lo, hi)) => Some((lo.min(date), hi.max(date))),
        })
}
