//! Evaluates translated filters and sort keys against serialized records,
//! following the document-store semantics: paths fan out across arrays, a
//! missing field equals `null`, and comparisons only match values of the
//! same type.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use regex::{Regex, RegexBuilder};
use serde_json::Value;

use scribe_core::error::RepoError;
use scribe_core::query::{Filter, FilterValue, Predicate, SortDirection, SortKey};

enum Test {
    Equal(FilterValue),
    NotEqual(FilterValue),
    Compare(FilterValue, fn(Ordering) -> bool),
    In(Vec<FilterValue>),
    NotIn(Vec<FilterValue>),
    Exists(bool),
    Regex(Regex),
}

/// A filter with its regular expressions compiled.
pub(super) struct CompiledFilter {
    conditions: Vec<(String, Test)>,
}

impl CompiledFilter {
    pub(super) fn compile(filter: &Filter) -> Result<Self, RepoError> {
        let conditions = filter
            .conditions
            .iter()
            .map(|c| {
                let test = match &c.predicate {
                    Predicate::Equal(v) => Test::Equal(v.clone()),
                    Predicate::NotEqual(v) => Test::NotEqual(v.clone()),
                    Predicate::GreaterThan(v) => Test::Compare(v.clone(), Ordering::is_gt),
                    Predicate::GreaterThanOrEqual(v) => Test::Compare(v.clone(), Ordering::is_ge),
                    Predicate::LessThan(v) => Test::Compare(v.clone(), Ordering::is_lt),
                    Predicate::LessThanOrEqual(v) => Test::Compare(v.clone(), Ordering::is_le),
                    Predicate::In(vs) => Test::In(vs.clone()),
                    Predicate::NotIn(vs) => Test::NotIn(vs.clone()),
                    Predicate::Exists(e) => Test::Exists(*e),
                    Predicate::Regex {
                        pattern,
                        case_insensitive,
                    } => Test::Regex(
                        RegexBuilder::new(pattern)
                            .case_insensitive(*case_insensitive)
                            .build()
                            .map_err(|e| RepoError::Query(e.to_string()))?,
                    ),
                };
                Ok((c.field.clone(), test))
            })
            .collect::<Result<_, RepoError>>()?;
        Ok(Self { conditions })
    }

    pub(super) fn matches(&self, doc: &Value) -> bool {
        self.conditions.iter().all(|(path, test)| {
            let values = lookup(doc, path);
            match test {
                Test::Equal(v) => any_equal(&values, v),
                Test::NotEqual(v) => !any_equal(&values, v),
                Test::Compare(v, accept) => values
                    .iter()
                    .any(|c| compare(c, v).is_some_and(|o| accept(o))),
                Test::In(vs) => vs.iter().any(|v| any_equal(&values, v)),
                Test::NotIn(vs) => !vs.iter().any(|v| any_equal(&values, v)),
                Test::Exists(expected) => !values.is_empty() == *expected,
                Test::Regex(re) => values
                    .iter()
                    .any(|c| c.as_str().is_some_and(|s| re.is_match(s))),
            }
        })
    }
}

/// Every value reachable at `path`. Arrays along the way are fanned out, and
/// an array at the end contributes both itself and its elements.
fn lookup<'a>(doc: &'a Value, path: &str) -> Vec<&'a Value> {
    let mut current = vec![doc];
    for segment in path.split('.') {
        let mut next = Vec::new();
        for value in current {
            match value {
                Value::Object(map) => next.extend(map.get(segment)),
                Value::Array(items) => next.extend(
                    items
                        .iter()
                        .filter_map(|item| item.as_object().and_then(|m| m.get(segment))),
                ),
                _ => {}
            }
        }
        current = next;
    }
    let mut values = Vec::new();
    for value in current {
        values.push(value);
        if let Value::Array(items) = value {
            values.extend(items.iter());
        }
    }
    values
}

fn as_date(value: &Value) -> Option<DateTime<Utc>> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|d| d.with_timezone(&Utc))
}

fn any_equal(values: &[&Value], expected: &FilterValue) -> bool {
    if values.is_empty() {
        return matches!(expected, FilterValue::Null);
    }
    values.iter().any(|v| compare(v, expected) == Some(Ordering::Equal))
}

/// Order `value` against `expected` when both are of the same type.
fn compare(value: &Value, expected: &FilterValue) -> Option<Ordering> {
    match (value, expected) {
        (Value::Null, FilterValue::Null) => Some(Ordering::Equal),
        (Value::Bool(a), FilterValue::Bool(b)) => Some(a.cmp(b)),
        (Value::Number(a), FilterValue::Number(b)) => a.as_f64()?.partial_cmp(b),
        (Value::String(a), FilterValue::Text(b)) => Some(a.as_str().cmp(b.as_str())),
        (Value::String(_), FilterValue::Date(b)) => Some(as_date(value)?.cmp(b)),
        _ => None,
    }
}

fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Number(_)) => 1,
        Some(Value::String(_)) => 2,
        Some(Value::Object(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Bool(_)) => 5,
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(s)), Some(Value::String(t))) => match (a.and_then(as_date), b.and_then(as_date)) {
            (Some(dx), Some(dy)) => dx.cmp(&dy),
            _ => s.cmp(t),
        },
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Compare two serialized records by the sort keys, in order.
pub(super) fn compare_by(keys: &[SortKey], a: &Value, b: &Value) -> Ordering {
    for key in keys {
        let ordering = compare_values(
            lookup(a, &key.field).first().copied(),
            lookup(b, &key.field).first().copied(),
        );
        let ordering = match key.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}
