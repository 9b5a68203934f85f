use tracing::info;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::ScalarValue;
use crate::schema::schema::{FieldId, FIELD_COUNT};
use crate::storage::column::Column;
use crate::storage::proxy::RecordRef;

/// One logical record as handed over by ingestion. Unset fields are absent.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<Option<ScalarValue>>,
}

impl Row {
    pub fn new() -> Self {
        Row { values: vec![None; FIELD_COUNT] }
    }

    pub fn with(mut self, field: FieldId, value: impl Into<ScalarValue>) -> Self {
        self.set(field, Some(value.into()));
        self
    }

    pub fn set(&mut self, field: FieldId, value: Option<ScalarValue>) {
        if self.values.len() != FIELD_COUNT {
            self.values.resize(FIELD_COUNT, None);
        }
        self.values[field.position()] = value;
    }

    pub fn get(&self, field: FieldId) -> Option<&ScalarValue> {
        self.values.get(field.position()).and_then(|v| v.as_ref())
    }

    /// Present (field, value) pairs in column order
    pub fn values(&self) -> impl Iterator<Item = (FieldId, &ScalarValue)> + '_ {
        FieldId::ALL.into_iter().filter_map(move |f| self.get(f).map(|v| (f, v)))
    }

    /// Check every present value against the declared kinds
    fn validate(&self) -> Result<()> {
        for field in FieldId::ALL {
            if let Some(value) = self.get(field) {
                if value.kind() != field.kind() {
                    return Err(Error::new(
                        ErrorKind::SchemaViolation,
                        format!("field '{}' is {} but row supplies {}",
                                field, field.kind(), value.kind())
                    ));
                }
            }
        }
        Ok(())
    }
}

impl Default for Row {
    fn default() -> Self {
        Self::new()
    }
}

/// Mutable construction phase of a record store
#[derive(Debug, Clone)]
pub struct RecordStoreBuilder {
    columns: Vec<Column>,
    len: usize,
}

impl RecordStoreBuilder {
    pub fn new() -> Self {
        RecordStoreBuilder {
            columns: FieldId::ALL.iter().map(|f| Column::empty(f.kind())).collect(),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append one row across every column. A row that violates the schema
    /// is rejected before anything is written.
    pub fn push_row(&mut self, row: Row) -> Result<()> {
        row.validate()?;

        let mut values = row.values;
        values.resize(FIELD_COUNT, None);
        for (column, value) in self.columns.iter_mut().zip(values) {
            if let Err(rejected) = column.push(value) {
                // validate() makes this unreachable
                return Err(Error::new(
                    ErrorKind::SchemaViolation,
                    format!("column of kind {} rejected {:?}", column.kind(), rejected)
                ));
            }
        }
        self.len += 1;
        Ok(())
    }

    /// Append all rows of `other` after this builder's rows
    pub fn merge(&mut self, other: RecordStoreBuilder) {
        for (column, tail) in self.columns.iter_mut().zip(other.columns) {
            column.append(tail);
        }
        self.len += other.len;
    }

    /// Freeze into an immutable store
    pub fn finish(mut self) -> RecordStore {
        for column in &mut self.columns {
            column.shrink_to_fit();
        }
        debug_assert!(self.columns.iter().all(|c| c.len() == self.len));
        info!(records = self.len, "record store finalized");

        RecordStore {
            columns: self.columns,
            len: self.len,
        }
    }
}

impl Default for RecordStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable columnar collision store: one sequence per field, all of
/// length `len`; index `i` across every column is one record.
#[derive(Debug)]
pub struct RecordStore {
    columns: Vec<Column>,
    len: usize,
}

impl RecordStore {
    /// Build a store from already-typed rows
    pub fn ingest<I>(rows: I) -> Result<RecordStore>
    where
        I: IntoIterator<Item = Row>,
    {
        let mut builder = RecordStoreBuilder::new();
        for row in rows {
            builder.push_row(row)?;
        }
        Ok(builder.finish())
    }

    pub fn empty() -> RecordStore {
        RecordStoreBuilder::new().finish()
    }

    pub fn size(&self) -> usize {
        self.len
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Column by external name
    pub fn field(&self, name: &str) -> Result<&Column> {
        let field = FieldId::from_name(name)?;
        Ok(self.column(field))
    }

    pub fn column(&self, field: FieldId) -> &Column {
        &self.columns[field.position()]
    }

    pub fn record(&self, index: usize) -> Option<RecordRef<'_>> {
        (index < self.len).then(|| RecordRef::new(self, index))
    }

    pub fn records(&self) -> impl Iterator<Item = RecordRef<'_>> + '_ {
        (0..self.len).map(move |i| RecordRef::new(self, i))
    }
}
