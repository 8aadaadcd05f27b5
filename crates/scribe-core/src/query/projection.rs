//! Field selection and ordering.

use serde_json::{Map, Value};

/// Which fields of a record are returned. `id` is always kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Projection {
    #[default]
    All,
    Include(Vec<String>),
    Exclude(Vec<String>),
}

impl Projection {
    /// Apply the projection to a serialized record in place.
    pub fn apply(&self, record: &mut Value) {
        match self {
            Projection::All => {}
            Projection::Include(paths) => {
                let Value::Object(source) = record else {
                    return;
                };
                let mut kept = Map::new();
                if let Some(id) = source.get("id") {
                    kept.insert("id".to_string(), id.clone());
                }
                for path in paths {
                    copy_path(source, &mut kept, path);
                }
                *record = Value::Object(kept);
            }
            Projection::Exclude(paths) => {
                for path in paths {
                    remove_path(record, path);
                }
            }
        }
    }
}

fn copy_path(source: &Map<String, Value>, target: &mut Map<String, Value>, path: &str) {
    let (head, rest) = match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    };
    let Some(value) = source.get(head) else {
        return;
    };
    match (rest, value) {
        (None, _) => {
            target.insert(head.to_string(), value.clone());
        }
        (Some(rest), Value::Object(inner)) => {
            let slot = target
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(slot) = slot {
                copy_path(inner, slot, rest);
            }
        }
        // Paths into arrays or scalars select nothing.
        (Some(_), _) => {}
    }
}

fn remove_path(record: &mut Value, path: &str) {
    let Value::Object(map) = record else {
        return;
    };
    match path.split_once('.') {
        None => {
            map.remove(path);
        }
        Some((head, rest)) => {
            if let Some(inner) = map.get_mut(head) {
                remove_path(inner, rest);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// One key of a multi-key sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_include_keeps_id_and_nested_paths() {
        let mut record = json!({
            "id": "p1",
            "title": "Ownership",
            "content": "long",
            "author": { "name": "Ada", "avatar": "a.png" }
        });
        Projection::Include(vec!["title".into(), "author.name".into()]).apply(&mut record);
        assert_eq!(
            record,
            json!({ "id": "p1", "title": "Ownership", "author": { "name": "Ada" } })
        );
    }

    #[test]
    fn test_exclude_removes_paths() {
        let mut record = json!({
            "id": "p1",
            "content": "long",
            "author": { "name": "Ada", "avatar": "a.png" }
        });
        Projection::Exclude(vec!["content".into(), "author.avatar".into()]).apply(&mut record);
        assert_eq!(record, json!({ "id": "p1", "author": { "name": "Ada" } }));
    }
}
