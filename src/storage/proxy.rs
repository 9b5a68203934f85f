use std::fmt;
use chrono::{NaiveDate, NaiveTime};
use serde_json::{Map, Value};
use crate::core::error::Result;
use crate::core::types::ScalarRef;
use crate::schema::schema::FieldId;
use crate::storage::record_store::{RecordStore, Row};

/// Read-only view of one record: a store handle plus an index.
/// Field access goes through the store's columns, so nothing is copied and
/// the borrow keeps the store alive and unmutated for the proxy's lifetime.
#[derive(Clone, Copy)]
pub struct RecordRef<'a> {
    store: &'a RecordStore,
    index: usize,
}

impl<'a> RecordRef<'a> {
    pub(crate) fn new(store: &'a RecordStore, index: usize) -> Self {
        RecordRef { store, index }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn store(&self) -> &'a RecordStore {
        self.store
    }

    pub fn get(&self, field: FieldId) -> Option<ScalarRef<'a>> {
        self.store.column(field).get(self.index)
    }

    /// Field by external name; `Ok(None)` when the field is absent
    pub fn field(&self, name: &str) -> Result<Option<ScalarRef<'a>>> {
        let field = FieldId::from_name(name)?;
        Ok(self.get(field))
    }

    pub fn borough(&self) -> Option<&'a str> {
        self.get(FieldId::Borough).and_then(|v| v.as_text())
    }

    pub fn crash_date(&self) -> Option<NaiveDate> {
        match self.get(FieldId::CrashDate) {
            Some(ScalarRef::Date(d)) => Some(d),
            _ => None,
        }
    }

    pub fn crash_time(&self) -> Option<NaiveTime> {
        match self.get(FieldId::CrashTime) {
            Some(ScalarRef::Time(t)) => Some(t),
            _ => None,
        }
    }

    pub fn zip_code(&self) -> Option<u64> {
        self.unsigned(FieldId::ZipCode)
    }

    pub fn collision_id(&self) -> Option<u64> {
        self.unsigned(FieldId::CollisionId)
    }

    fn unsigned(&self, field: FieldId) -> Option<u64> {
        match self.get(field) {
            Some(ScalarRef::Unsigned(v)) => Some(v),
            _ => None,
        }
    }

    /// Copy this record out of the store
    pub fn to_row(&self) -> Row {
        let mut row = Row::new();
        for field in FieldId::ALL {
            row.set(field, self.get(field).map(|v| v.to_owned()));
        }
        row
    }

    /// JSON object keyed by field name; absent fields are null
    pub fn to_json(&self) -> Value {
        let mut object = Map::with_capacity(FieldId::ALL.len());
        for field in FieldId::ALL {
            let value = match self.get(field) {
                None => Value::Null,
                Some(ScalarRef::Numeric(v)) => serde_json::Number::from_f64(v)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
                Some(ScalarRef::Unsigned(v)) => Value::from(v),
                Some(ScalarRef::Text(v)) => Value::from(v),
                Some(ScalarRef::Date(d)) => Value::from(d.format("%Y-%m-%d").to_string()),
                Some(ScalarRef::Time(t)) => Value::from(t.format("%H:%M").to_string()),
            };
            object.insert(field.name().to_string(), value);
        }
        Value::Object(object)
    }
}

impl PartialEq for RecordRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.store, other.store) && self.index == other.index
    }
}

impl Eq for RecordRef<'_> {}

impl fmt::Debug for RecordRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("RecordRef").field("index", &self.index).finish()
    }
}

impl fmt::Display for RecordRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Collision: {")?;
        for field in FieldId::ALL {
            match self.get(field) {
                Some(value) => write!(f, "{} = {}, ", field, value)?,
                None => write!(f, "{} = (no value), ", field)?,
            }
        }
        f.write_str("}")
    }
}
