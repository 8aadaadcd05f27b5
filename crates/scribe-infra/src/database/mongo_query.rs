//! Translated filters and sort keys as MongoDB query documents.

use bson::{Bson, DateTime, Document, doc};

use scribe_core::query::{Filter, FilterValue, Predicate, SortDirection, SortKey};

/// Public `id` is stored as `_id`, at any depth (`comments.id` → `comments._id`).
pub(crate) fn store_path(field: &str) -> String {
    field
        .split('.')
        .map(|segment| if segment == "id" { "_id" } else { segment })
        .collect::<Vec<_>>()
        .join(".")
}

fn to_bson(value: &FilterValue) -> Bson {
    match value {
        FilterValue::Null => Bson::Null,
        FilterValue::Bool(b) => Bson::Boolean(*b),
        FilterValue::Number(n) => Bson::Double(*n),
        FilterValue::Text(s) => Bson::String(s.clone()),
        FilterValue::Date(d) => Bson::DateTime(DateTime::from_chrono(*d)),
    }
}

fn to_bson_array(values: &[FilterValue]) -> Bson {
    Bson::Array(values.iter().map(to_bson).collect())
}

fn predicate_document(predicate: &Predicate) -> Document {
    match predicate {
        Predicate::Equal(v) => doc! { "$eq": to_bson(v) },
        Predicate::NotEqual(v) => doc! { "$ne": to_bson(v) },
        Predicate::GreaterThan(v) => doc! { "$gt": to_bson(v) },
        Predicate::GreaterThanOrEqual(v) => doc! { "$gte": to_bson(v) },
        Predicate::LessThan(v) => doc! { "$lt": to_bson(v) },
        Predicate::LessThanOrEqual(v) => doc! { "$lte": to_bson(v) },
        Predicate::In(vs) => doc! { "$in": to_bson_array(vs) },
        Predicate::NotIn(vs) => doc! { "$nin": to_bson_array(vs) },
        Predicate::Exists(e) => doc! { "$exists": *e },
        Predicate::Regex {
            pattern,
            case_insensitive,
        } => {
            let mut regex = doc! { "$regex": pattern.as_str() };
            if *case_insensitive {
                regex.insert("$options", "i");
            }
            regex
        }
    }
}

/// `{ "$and": [ { field: { op: value } }, ... ] }`, or `{}` for an empty filter.
/// `$and` keeps repeated fields (`a>1&a<5`) from overwriting each other.
pub(crate) fn filter_document(filter: &Filter) -> Document {
    if filter.is_empty() {
        return Document::new();
    }
    let clauses: Vec<Bson> = filter
        .conditions
        .iter()
        .map(|c| {
            let mut clause = Document::new();
            clause.insert(store_path(&c.field), predicate_document(&c.predicate));
            Bson::Document(clause)
        })
        .collect();
    doc! { "$and": clauses }
}

pub(crate) fn sort_document(keys: &[SortKey]) -> Document {
    let mut sort = Document::new();
    for key in keys {
        let direction = match key.direction {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        };
        sort.insert(store_path(&key.field), direction);
    }
    sort
}
