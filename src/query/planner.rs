use crate::core::types::ScalarValue;
use crate::query::ast::Query;
use crate::schema::schema::FieldId;

/// Execution plan for one conjunctive query
#[derive(Debug, Clone, PartialEq)]
pub enum ScanPlan {
    /// Evaluate every predicate over every record
    FullScan,
    /// Fetch the index bucket for `key`, then apply `residual` to each
    /// candidate in bucket order
    IndexSeek {
        field: FieldId,
        key: ScalarValue,
        residual: Query,
    },
}

/// Chooses between a full scan and an index seek
pub struct QueryPlanner;

impl QueryPlanner {
    /// The first plain `Equals` predicate (not inverted, case-sensitive) on
    /// an indexed field turns the query into an index seek; everything else
    /// becomes the residual. Without one, the query is a full scan.
    pub fn plan(query: &Query, indexed_fields: &[FieldId]) -> ScanPlan {
        let seek = query
            .predicates()
            .iter()
            .position(|p| p.is_point_lookup() && indexed_fields.contains(&p.field()));

        match seek {
            Some(position) => {
                let predicate = &query.predicates()[position];
                ScanPlan::IndexSeek {
                    field: predicate.field(),
                    key: predicate.operand().clone(),
                    residual: query.without(position),
                }
            }
            None => ScanPlan::FullScan,
        }
    }
}
