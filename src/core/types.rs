use std::fmt;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Declared value type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarKind {
    Numeric,
    Unsigned,
    Text,
    Date,
    Time,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ScalarKind::Numeric => "numeric",
            ScalarKind::Unsigned => "unsigned",
            ScalarKind::Text => "text",
            ScalarKind::Date => "date",
            ScalarKind::Time => "time",
        };
        f.write_str(name)
    }
}

/// Owned scalar, used for operands and ingested rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScalarValue {
    Numeric(f64),
    Unsigned(u64),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
}

impl ScalarValue {
    pub fn kind(&self) -> ScalarKind {
        match self {
            ScalarValue::Numeric(_) => ScalarKind::Numeric,
            ScalarValue::Unsigned(_) => ScalarKind::Unsigned,
            ScalarValue::Text(_) => ScalarKind::Text,
            ScalarValue::Date(_) => ScalarKind::Date,
            ScalarValue::Time(_) => ScalarKind::Time,
        }
    }

    pub fn as_ref(&self) -> ScalarRef<'_> {
        match self {
            ScalarValue::Numeric(v) => ScalarRef::Numeric(*v),
            ScalarValue::Unsigned(v) => ScalarRef::Unsigned(*v),
            ScalarValue::Text(v) => ScalarRef::Text(v),
            ScalarValue::Date(v) => ScalarRef::Date(*v),
            ScalarValue::Time(v) => ScalarRef::Time(*v),
        }
    }

    /// Calendar date from year/month/day; `None` if the date does not exist
    pub fn date(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(ScalarValue::Date)
    }

    /// Clock time from hour/minute; `None` if out of range
    pub fn time(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(ScalarValue::Time)
    }
}

impl From<f64> for ScalarValue {
    fn from(v: f64) -> Self {
        ScalarValue::Numeric(v)
    }
}

impl From<u64> for ScalarValue {
    fn from(v: u64) -> Self {
        ScalarValue::Unsigned(v)
    }
}

impl From<&str> for ScalarValue {
    fn from(v: &str) -> Self {
        ScalarValue::Text(v.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(v: String) -> Self {
        ScalarValue::Text(v)
    }
}

impl From<NaiveDate> for ScalarValue {
    fn from(v: NaiveDate) -> Self {
        ScalarValue::Date(v)
    }
}

impl From<NaiveTime> for ScalarValue {
    fn from(v: NaiveTime) -> Self {
        ScalarValue::Time(v)
    }
}

/// Borrowed view of one stored scalar. Text borrows from the column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarRef<'a> {
    Numeric(f64),
    Unsigned(u64),
    Text(&'a str),
    Date(NaiveDate),
    Time(NaiveTime),
}

impl<'a> ScalarRef<'a> {
    pub fn kind(&self) -> ScalarKind {
        match self {
            ScalarRef::Numeric(_) => ScalarKind::Numeric,
            ScalarRef::Unsigned(_) => ScalarKind::Unsigned,
            ScalarRef::Text(_) => ScalarKind::Text,
            ScalarRef::Date(_) => ScalarKind::Date,
            ScalarRef::Time(_) => ScalarKind::Time,
        }
    }

    pub fn to_owned(&self) -> ScalarValue {
        match *self {
            ScalarRef::Numeric(v) => ScalarValue::Numeric(v),
            ScalarRef::Unsigned(v) => ScalarValue::Unsigned(v),
            ScalarRef::Text(v) => ScalarValue::Text(v.to_string()),
            ScalarRef::Date(v) => ScalarValue::Date(v),
            ScalarRef::Time(v) => ScalarValue::Time(v),
        }
    }

    pub fn as_text(&self) -> Option<&'a str> {
        match *self {
            ScalarRef::Text(v) => Some(v),
            _ => None,
        }
    }
}

/// Console rendering used by the record display: dates as MM/DD/YYYY,
/// times as HH:MM.
impl fmt::Display for ScalarRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScalarRef::Numeric(v) => write!(f, "{:.6}", v),
            ScalarRef::Unsigned(v) => write!(f, "{}", v),
            ScalarRef::Text(v) => f.write_str(v),
            ScalarRef::Date(v) => write!(f, "{}", v.format("%m/%d/%Y")),
            ScalarRef::Time(v) => write!(f, "{}", v.format("%H:%M")),
        }
    }
}
