use chrono::{NaiveDate, NaiveTime};
use crate::core::types::{ScalarKind, ScalarRef, ScalarValue};

/// One field's values across all records. The variant is fixed by the
/// field's declared kind, so every slot is either absent or of that kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Numeric(Vec<Option<f64>>),
    Unsigned(Vec<Option<u64>>),
    Text(Vec<Option<String>>),
    Date(Vec<Option<NaiveDate>>),
    Time(Vec<Option<NaiveTime>>),
}

impl Column {
    pub fn empty(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::Numeric => Column::Numeric(Vec::new()),
            ScalarKind::Unsigned => Column::Unsigned(Vec::new()),
            ScalarKind::Text => Column::Text(Vec::new()),
            ScalarKind::Date => Column::Date(Vec::new()),
            ScalarKind::Time => Column::Time(Vec::new()),
        }
    }

    pub fn kind(&self) -> ScalarKind {
        match self {
            Column::Numeric(_) => ScalarKind::Numeric,
            Column::Unsigned(_) => ScalarKind::Unsigned,
            Column::Text(_) => ScalarKind::Text,
            Column::Date(_) => ScalarKind::Date,
            Column::Time(_) => ScalarKind::Time,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Unsigned(v) => v.len(),
            Column::Text(v) => v.len(),
            Column::Date(v) => v.len(),
            Column::Time(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at `index`; `None` when absent or out of range
    pub fn get(&self, index: usize) -> Option<ScalarRef<'_>> {
        match self {
            Column::Numeric(v) => v.get(index).copied().flatten().map(ScalarRef::Numeric),
            Column::Unsigned(v) => v.get(index).copied().flatten().map(ScalarRef::Unsigned),
            Column::Text(v) => v.get(index).and_then(|s| s.as_deref()).map(ScalarRef::Text),
            Column::Date(v) => v.get(index).copied().flatten().map(ScalarRef::Date),
            Column::Time(v) => v.get(index).copied().flatten().map(ScalarRef::Time),
        }
    }

    pub fn is_present(&self, index: usize) -> bool {
        match self {
            Column::Numeric(v) => matches!(v.get(index), Some(Some(_))),
            Column::Unsigned(v) => matches!(v.get(index), Some(Some(_))),
            Column::Text(v) => matches!(v.get(index), Some(Some(_))),
            Column::Date(v) => matches!(v.get(index), Some(Some(_))),
            Column::Time(v) => matches!(v.get(index), Some(Some(_))),
        }
    }

    /// Number of present slots
    pub fn present_count(&self) -> usize {
        match self {
            Column::Numeric(v) => v.iter().filter(|x| x.is_some()).count(),
            Column::Unsigned(v) => v.iter().filter(|x| x.is_some()).count(),
            Column::Text(v) => v.iter().filter(|x| x.is_some()).count(),
            Column::Date(v) => v.iter().filter(|x| x.is_some()).count(),
            Column::Time(v) => v.iter().filter(|x| x.is_some()).count(),
        }
    }

    /// Append one slot. Returns the rejected value if its kind differs
    /// from the column's; the column is unchanged in that case.
    pub(crate) fn push(&mut self, value: Option<ScalarValue>) -> std::result::Result<(), ScalarValue> {
        match (self, value) {
            (Column::Numeric(v), None) => v.push(None),
            (Column::Unsigned(v), None) => v.push(None),
            (Column::Text(v), None) => v.push(None),
            (Column::Date(v), None) => v.push(None),
            (Column::Time(v), None) => v.push(None),
            (Column::Numeric(v), Some(ScalarValue::Numeric(x))) => v.push(Some(x)),
            (Column::Unsigned(v), Some(ScalarValue::Unsigned(x))) => v.push(Some(x)),
            (Column::Text(v), Some(ScalarValue::Text(x))) => v.push(Some(x)),
            (Column::Date(v), Some(ScalarValue::Date(x))) => v.push(Some(x)),
            (Column::Time(v), Some(ScalarValue::Time(x))) => v.push(Some(x)),
            (_, Some(other)) => return Err(other),
        }
        Ok(())
    }

    /// Append all slots of `other`, which must be of the same kind
    pub(crate) fn append(&mut self, other: Column) {
        match (self, other) {
            (Column::Numeric(a), Column::Numeric(b)) => a.extend(b),
            (Column::Unsigned(a), Column::Unsigned(b)) => a.extend(b),
            (Column::Text(a), Column::Text(b)) => a.extend(b),
            (Column::Date(a), Column::Date(b)) => a.extend(b),
            (Column::Time(a), Column::Time(b)) => a.extend(b),
            (a, b) => unreachable!("column kind mismatch: {} vs {}", a.kind(), b.kind()),
        }
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        match self {
            Column::Numeric(v) => v.shrink_to_fit(),
            Column::Unsigned(v) => v.shrink_to_fit(),
            Column::Text(v) => v.shrink_to_fit(),
            Column::Date(v) => v.shrink_to_fit(),
            Column::Time(v) => v.shrink_to_fit(),
        }
    }
}
