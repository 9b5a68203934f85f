use std::ops::Range;
use crate::core::types::ScalarValue;
use crate::query::ast::{Operator, Predicate};
use crate::storage::column::Column;

/// Ordering and equality tests for numeric, unsigned, date and time values.
/// Dates order by (year, month, day); times by duration since midnight.
fn test_ordered<T: PartialOrd>(operator: Operator, value: &T, operand: &T) -> bool {
    match operator {
        Operator::HasValue => true,
        Operator::Equals => value == operand,
        Operator::LessThan => value < operand,
        Operator::GreaterThan => value > operand,
        Operator::Contains => false,
    }
}

/// Equality and substring tests for text. `needle` is already lowercased
/// when `fold` is set.
fn test_text(operator: Operator, value: &str, needle: &str, fold: bool) -> bool {
    match operator {
        Operator::HasValue => true,
        Operator::Equals if !fold => value == needle,
        Operator::Equals => {
            if value.is_ascii() {
                value.eq_ignore_ascii_case(needle)
            } else {
                value.to_lowercase() == needle
            }
        }
        Operator::Contains if !fold => value.contains(needle),
        Operator::Contains => value.to_lowercase().contains(needle),
        Operator::LessThan | Operator::GreaterThan => false,
    }
}

/// Evaluate one predicate at one record index, after `invert`.
/// An absent value fails every operator; for `HasValue` that is exactly
/// the absence report.
pub fn matches_at(predicate: &Predicate, column: &Column, index: usize) -> bool {
    let op = predicate.operator();
    let raw = match (column, predicate.operand()) {
        (Column::Numeric(values), ScalarValue::Numeric(operand)) => values
            .get(index)
            .and_then(|v| v.as_ref())
            .is_some_and(|v| test_ordered(op, v, operand)),
        (Column::Unsigned(values), ScalarValue::Unsigned(operand)) => values
            .get(index)
            .and_then(|v| v.as_ref())
            .is_some_and(|v| test_ordered(op, v, operand)),
        (Column::Date(values), ScalarValue::Date(operand)) => values
            .get(index)
            .and_then(|v| v.as_ref())
            .is_some_and(|v| test_ordered(op, v, operand)),
        (Column::Time(values), ScalarValue::Time(operand)) => values
            .get(index)
            .and_then(|v| v.as_ref())
            .is_some_and(|v| test_ordered(op, v, operand)),
        (Column::Text(values), ScalarValue::Text(_)) => {
            let needle = predicate.needle();
            let fold = predicate.is_case_insensitive();
            values
                .get(index)
                .and_then(|v| v.as_deref())
                .is_some_and(|v| test_text(op, v, needle, fold))
        }
        // Construction rules out kind mismatches
        _ => false,
    };
    raw != predicate.is_inverted()
}

/// AND one predicate into `mask`, which covers `range` of the column.
/// Slots already false are left alone.
pub fn and_mask(predicate: &Predicate, column: &Column, range: Range<usize>, mask: &mut [bool]) {
    debug_assert_eq!(range.len(), mask.len());
    let op = predicate.operator();
    let invert = predicate.is_inverted();

    match (column, predicate.operand()) {
        (Column::Numeric(values), ScalarValue::Numeric(operand)) => {
            fill(mask, &values[range], invert, |v| test_ordered(op, v, operand))
        }
        (Column::Unsigned(values), ScalarValue::Unsigned(operand)) => {
            fill(mask, &values[range], invert, |v| test_ordered(op, v, operand))
        }
        (Column::Date(values), ScalarValue::Date(operand)) => {
            fill(mask, &values[range], invert, |v| test_ordered(op, v, operand))
        }
        (Column::Time(values), ScalarValue::Time(operand)) => {
            fill(mask, &values[range], invert, |v| test_ordered(op, v, operand))
        }
        (Column::Text(values), ScalarValue::Text(_)) => {
            let needle = predicate.needle();
            let fold = predicate.is_case_insensitive();
            fill(mask, &values[range], invert, |v: &String| test_text(op, v, needle, fold))
        }
        // Construction rules out kind mismatches; the raw test fails everywhere
        _ => {
            for slot in mask.iter_mut() {
                *slot = *slot && invert;
            }
        }
    }
}

fn fill<T, F>(mask: &mut [bool], values: &[Option<T>], invert: bool, test: F)
where
    F: Fn(&T) -> bool,
{
    for (slot, value) in mask.iter_mut().zip(values) {
        if *slot {
            let raw = value.as_ref().is_some_and(&test);
            *slot = raw != invert;
        }
    }
}
