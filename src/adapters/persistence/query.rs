//! Predicate Query Engine - Filter Evaluation over JSON Records
//!
//! Evaluates the restricted [`Filter`] language against in-memory
//! records of one collection at a time. A record matches when every
//! constrained field matches; per field the rule is:
//!
//! 1. record field is an array and the filter value is not ⇒
//!    membership test (e.g. a student id against `enrolledStudents`);
//! 2. otherwise ⇒ strict value equality, no type coercion.
//!
//! A field absent from the record never matches. An empty filter
//! matches every record. Output order is collection order.

use serde_json::Value;

use crate::ports::store::Filter;

/// Does `record` satisfy every field of `filter`?
pub fn matches(record: &Value, filter: &Filter) -> bool {
    filter.entries().all(|(field, expected)| {
        match record.get(field) {
            Some(Value::Array(items)) if !expected.is_array() => items.contains(expected),
            Some(actual) => actual == expected,
            None => false,
        }
    })
}

/// All records matching the filter, in original order.
pub fn filter_records<'a>(
    records: &'a [Value],
    filter: &Filter,
) -> impl Iterator<Item = &'a Value> {
    records.iter().filter(move |record| matches(record, filter))
}
