use std::fmt;
use serde::{Deserialize, Serialize};
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{ScalarKind, ScalarValue};
use crate::query::matcher;
use crate::schema::schema::FieldId;
use crate::storage::record_store::RecordStore;

/// Test applied to one field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    HasValue,     // Field present; operand ignored
    Equals,
    LessThan,     // Not defined for text
    GreaterThan,  // Not defined for text
    Contains,     // Text only: operand is a substring
}

impl Operator {
    pub fn supports(self, kind: ScalarKind) -> bool {
        match self {
            Operator::HasValue | Operator::Equals => true,
            Operator::LessThan | Operator::GreaterThan => kind != ScalarKind::Text,
            Operator::Contains => kind == ScalarKind::Text,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Operator::HasValue => "has_value",
            Operator::Equals => "equals",
            Operator::LessThan => "less_than",
            Operator::GreaterThan => "greater_than",
            Operator::Contains => "contains",
        };
        f.write_str(name)
    }
}

/// One validated field test. Immutable after construction: the operand's
/// kind is the field's kind and the operator is defined for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    field: FieldId,
    operator: Operator,
    operand: ScalarValue,
    invert: bool,
    case_insensitive: bool,
    // Text operand, lowercased up front when matching ignores case
    needle: Option<String>,
}

impl Predicate {
    /// Build a predicate on a field given by name
    pub fn new(
        field: &str,
        operator: Operator,
        operand: impl Into<ScalarValue>,
        invert: bool,
        case_insensitive: bool,
    ) -> Result<Self> {
        let field = FieldId::from_name(field)?;
        Self::on(field, operator, operand, invert, case_insensitive)
    }

    /// Build a predicate on an already resolved field
    pub fn on(
        field: FieldId,
        operator: Operator,
        operand: impl Into<ScalarValue>,
        invert: bool,
        case_insensitive: bool,
    ) -> Result<Self> {
        let operand = operand.into();
        let kind = field.kind();

        if operand.kind() != kind {
            return Err(Error::new(
                ErrorKind::TypeMismatch,
                format!("field '{}' is {} but operand is {}", field, kind, operand.kind())
            ));
        }
        if !operator.supports(kind) {
            return Err(Error::new(
                ErrorKind::UnsupportedOperator,
                format!("operator {} is not defined for {} field '{}'", operator, kind, field)
            ));
        }

        let needle = match &operand {
            ScalarValue::Text(text) if case_insensitive => Some(text.to_lowercase()),
            ScalarValue::Text(text) => Some(text.clone()),
            _ => None,
        };

        Ok(Predicate { field, operator, operand, invert, case_insensitive, needle })
    }

    /// `field Equals value`, no modifiers
    pub fn equals(field: &str, value: impl Into<ScalarValue>) -> Result<Self> {
        Self::new(field, Operator::Equals, value, false, false)
    }

    /// `field HasValue`; the operand is a placeholder of the field's kind
    pub fn has_value(field: &str) -> Result<Self> {
        let field = FieldId::from_name(field)?;
        let placeholder = match field.kind() {
            ScalarKind::Numeric => ScalarValue::Numeric(0.0),
            ScalarKind::Unsigned => ScalarValue::Unsigned(0),
            ScalarKind::Text => ScalarValue::Text(String::new()),
            ScalarKind::Date => ScalarValue::Date(chrono::NaiveDate::default()),
            ScalarKind::Time => ScalarValue::Time(chrono::NaiveTime::default()),
        };
        Self::on(field, Operator::HasValue, placeholder, false, false)
    }

    /// Same test with the result negated
    pub fn inverted(mut self) -> Self {
        self.invert = !self.invert;
        self
    }

    pub fn field(&self) -> FieldId {
        self.field
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn operand(&self) -> &ScalarValue {
        &self.operand
    }

    pub fn is_inverted(&self) -> bool {
        self.invert
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    pub(crate) fn needle(&self) -> &str {
        self.needle.as_deref().unwrap_or("")
    }

    /// A plain equality test that a secondary index on the field can answer
    pub fn is_point_lookup(&self) -> bool {
        self.operator == Operator::Equals && !self.invert && !self.case_insensitive
    }

    /// Evaluate at record `index`, after `invert`
    pub fn matches(&self, store: &RecordStore, index: usize) -> bool {
        matcher::matches_at(self, store.column(self.field), index)
    }
}

/// AND-conjunction of predicates in declaration order. The empty query
/// matches every record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    predicates: Vec<Predicate>,
}

impl Query {
    pub fn new() -> Self {
        Query { predicates: Vec::new() }
    }

    /// Start a query from one predicate
    pub fn create(predicate: Predicate) -> Self {
        Query::new().add(predicate)
    }

    pub fn add(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// AND over predicates, short-circuiting on the first miss
    pub fn matches(&self, store: &RecordStore, index: usize) -> bool {
        self.predicates.iter().all(|p| p.matches(store, index))
    }

    /// Copy of this query without the predicate at `position`
    pub(crate) fn without(&self, position: usize) -> Query {
        let predicates = self.predicates
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != position)
            .map(|(_, p)| p.clone())
            .collect();
        Query { predicates }
    }
}

impl FromIterator<Predicate> for Query {
    fn from_iter<T: IntoIterator<Item = Predicate>>(iter: T) -> Self {
        Query { predicates: iter.into_iter().collect() }
    }
}
