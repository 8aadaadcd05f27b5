//! Filter conditions produced from query-string terms.
//!
//! A [`Filter`] is a conjunction of [`FilterCondition`]s. Store adapters turn it
//! into their own query language; the field paths are the public, camelCase
//! JSON paths (`readTime.value`, `comments.username`, `id`).

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};

/// A scalar value compared against a document field.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Date(DateTime<Utc>),
}

impl FilterValue {
    /// Coerce a raw query-string value into the most specific type it parses as.
    pub fn coerce(raw: &str) -> Self {
        match raw {
            "null" => return Self::Null,
            "true" => return Self::Bool(true),
            "false" => return Self::Bool(false),
            _ => {}
        }
        if looks_numeric(raw) {
            if let Ok(n) = raw.parse::<f64>() {
                if n.is_finite() {
                    return Self::Number(n);
                }
            }
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Self::Date(dt.with_timezone(&Utc));
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
                return Self::Date(midnight.and_utc());
            }
        }
        Self::Text(raw.to_string())
    }
}

fn looks_numeric(raw: &str) -> bool {
    !raw.is_empty()
        && raw.chars().any(|c| c.is_ascii_digit())
        && raw
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Date(d) => write!(f, "{}", d.to_rfc3339()),
        }
    }
}

/// What a condition asserts about its field.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Equal(FilterValue),
    NotEqual(FilterValue),
    GreaterThan(FilterValue),
    GreaterThanOrEqual(FilterValue),
    LessThan(FilterValue),
    LessThanOrEqual(FilterValue),
    In(Vec<FilterValue>),
    NotIn(Vec<FilterValue>),
    Exists(bool),
    Regex {
        pattern: String,
        case_insensitive: bool,
    },
}

/// A single `field <predicate>` condition.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCondition {
    pub field: String,
    pub predicate: Predicate,
}

impl FilterCondition {
    pub fn new(field: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            field: field.into(),
            predicate,
        }
    }

    pub fn eq(field: impl Into<String>, value: FilterValue) -> Self {
        Self::new(field, Predicate::Equal(value))
    }
}

/// Conjunction of conditions. An empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub conditions: Vec<FilterCondition>,
}

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with(mut self, condition: FilterCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}
