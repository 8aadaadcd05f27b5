//! Query translation - turns list query strings into store queries.
//!
//! Reserved keys control paging and shape (`limit`, `skip`/`offset`, `sort`,
//! `fields`); every other pair becomes a [`FilterCondition`]:
//!
//! | term            | condition            |
//! |-----------------|----------------------|
//! | `key=value`     | equal                |
//! | `key=a,b`       | in list              |
//! | `key!=value`    | not equal / not in   |
//! | `key>value`     | greater than         |
//! | `key>=value`    | greater or equal     |
//! | `key<value`     | less than            |
//! | `key<=value`    | less or equal        |
//! | `key`           | field exists         |
//! | `!key`          | field does not exist |
//! | `key=/re/i`     | regular expression   |

mod filter;
mod links;
mod projection;

pub use filter::{Filter, FilterCondition, FilterValue, Predicate};
pub use links::{PageLinks, page_links};
pub use projection::{Projection, SortDirection, SortKey};

use crate::error::DomainError;

pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;
/// Largest skip a document store accepts (a signed 64-bit count).
pub const MAX_SKIP: u64 = i64::MAX as u64;

/// A translated list request.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub filter: Filter,
    pub projection: Projection,
    pub sort: Vec<SortKey>,
    pub limit: u64,
    pub skip: u64,
    /// Original pairs minus `skip`/`offset`, repeated in pagination links.
    link_params: Vec<(String, String)>,
}

impl ListQuery {
    /// Unfiltered first page.
    pub fn first_page(limit: u64) -> Self {
        Self {
            filter: Filter::all(),
            projection: Projection::All,
            sort: Vec::new(),
            limit,
            skip: 0,
            link_params: Vec::new(),
        }
    }

    pub fn links(&self, base_url: &str, total: u64) -> PageLinks {
        page_links(base_url, &self.link_params, self.skip, self.limit, total)
    }

    pub fn number_of_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }
}

/// Translates query-string pairs into a [`ListQuery`].
#[derive(Debug, Clone, Copy)]
pub struct QueryTranslator {
    default_limit: u64,
    max_limit: u64,
}

impl Default for QueryTranslator {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT, MAX_LIMIT)
    }
}

impl QueryTranslator {
    pub fn new(default_limit: u64, max_limit: u64) -> Self {
        let max_limit = max_limit.max(1);
        Self {
            default_limit: default_limit.clamp(1, max_limit),
            max_limit,
        }
    }

    pub fn default_limit(&self) -> u64 {
        self.default_limit
    }

    /// Translate a raw (still percent-encoded) query string.
    pub fn translate_str(&self, query_string: &str) -> Result<ListQuery, DomainError> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query_string)
            .map_err(|e| DomainError::Validation(format!("malformed query string: {e}")))?;
        self.translate(&pairs)
    }

    pub fn translate(&self, pairs: &[(String, String)]) -> Result<ListQuery, DomainError> {
        let mut query = ListQuery::first_page(self.default_limit);

        for (key, value) in pairs {
            match key.as_str() {
                "limit" => {
                    query.limit = parse_count(key, value)?
                        .filter(|&n| n > 0)
                        .ok_or_else(|| {
                            DomainError::Validation("limit must be a positive integer".to_string())
                        })?
                        .min(self.max_limit);
                }
                "skip" | "offset" => {
                    query.skip = parse_count(key, value)?.unwrap_or(0).min(MAX_SKIP);
                    continue;
                }
                "sort" => query.sort = parse_sort(value)?,
                "fields" => query.projection = parse_fields(value)?,
                _ => query.filter.conditions.push(parse_condition(key, value)?),
            }
            query.link_params.push((key.clone(), value.clone()));
        }

        tracing::debug!(
            conditions = query.filter.conditions.len(),
            limit = query.limit,
            skip = query.skip,
            "Translated list query"
        );
        Ok(query)
    }
}

fn parse_count(key: &str, value: &str) -> Result<Option<u64>, DomainError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    value
        .trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|_| DomainError::Validation(format!("{key} must be a non-negative integer")))
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn parse_sort(value: &str) -> Result<Vec<SortKey>, DomainError> {
    split_list(value)
        .map(|term| {
            let key = if let Some(field) = term.strip_prefix('-') {
                SortKey::desc(field)
            } else {
                SortKey::asc(term.strip_prefix('+').unwrap_or(term))
            };
            if key.field.is_empty() {
                Err(DomainError::Validation("sort field must not be empty".to_string()))
            } else {
                Ok(key)
            }
        })
        .collect()
}

fn parse_fields(value: &str) -> Result<Projection, DomainError> {
    let mut include = Vec::new();
    let mut exclude = Vec::new();
    for term in split_list(value) {
        match term.strip_prefix('-') {
            Some(field) => exclude.push(field.to_string()),
            None => include.push(term.strip_prefix('+').unwrap_or(term).to_string()),
        }
    }
    match (include.is_empty(), exclude.is_empty()) {
        (true, true) => Ok(Projection::All),
        (false, true) => Ok(Projection::Include(include)),
        (true, false) => Ok(Projection::Exclude(exclude)),
        (false, false) => Err(DomainError::Validation(
            "fields cannot mix included and excluded fields".to_string(),
        )),
    }
}

fn field_name(raw: &str) -> Result<String, DomainError> {
    let field = raw.trim();
    if field.is_empty() {
        return Err(DomainError::Validation("filter field must not be empty".to_string()));
    }
    Ok(field.to_string())
}

fn parse_values(value: &str) -> Vec<FilterValue> {
    split_list(value).map(FilterValue::coerce).collect()
}

/// Parse `/pattern/flags`.
fn parse_regex(value: &str) -> Option<Result<Predicate, DomainError>> {
    let body = value.strip_prefix('/')?;
    let end = body.rfind('/')?;
    let (pattern, flags) = (&body[..end], &body[end + 1..]);
    if flags.chars().any(|c| c != 'i') {
        return None;
    }
    Some(match regex::Regex::new(pattern) {
        Ok(_) => Ok(Predicate::Regex {
            pattern: pattern.to_string(),
            case_insensitive: flags.contains('i'),
        }),
        Err(e) => Err(DomainError::Validation(format!("invalid pattern {value}: {e}"))),
    })
}

/// Parse one non-reserved pair. Form decoding splits at the first `=`, so
/// `a>=5` arrives as (`a>`, `5`) and `a>5` as (`a>5`, ``).
fn parse_condition(key: &str, value: &str) -> Result<FilterCondition, DomainError> {
    if value.is_empty() {
        if let Some(field) = key.strip_prefix('!') {
            return Ok(FilterCondition::new(field_name(field)?, Predicate::Exists(false)));
        }
        if let Some(pos) = key.find(['>', '<']) {
            let (field, rest) = key.split_at(pos);
            let operand = FilterValue::coerce(&rest[1..]);
            let predicate = if rest.starts_with('>') {
                Predicate::GreaterThan(operand)
            } else {
                Predicate::LessThan(operand)
            };
            return Ok(FilterCondition::new(field_name(field)?, predicate));
        }
        return Ok(FilterCondition::new(field_name(key)?, Predicate::Exists(true)));
    }

    if let Some(field) = key.strip_suffix('!') {
        let mut values = parse_values(value);
        let predicate = if values.len() == 1 {
            Predicate::NotEqual(values.remove(0))
        } else {
            Predicate::NotIn(values)
        };
        return Ok(FilterCondition::new(field_name(field)?, predicate));
    }
    if let Some(field) = key.strip_suffix('>') {
        let predicate = Predicate::GreaterThanOrEqual(FilterValue::coerce(value));
        return Ok(FilterCondition::new(field_name(field)?, predicate));
    }
    if let Some(field) = key.strip_suffix('<') {
        let predicate = Predicate::LessThanOrEqual(FilterValue::coerce(value));
        return Ok(FilterCondition::new(field_name(field)?, predicate));
    }
    if let Some(regex) = parse_regex(value) {
        return Ok(FilterCondition::new(field_name(key)?, regex?));
    }
    if value.contains(',') {
        return Ok(FilterCondition::new(field_name(key)?, Predicate::In(parse_values(value))));
    }
    Ok(FilterCondition::eq(field_name(key)?, FilterValue::coerce(value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translate(qs: &str) -> ListQuery {
        QueryTranslator::default().translate_str(qs).unwrap()
    }

    fn only_condition(qs: &str) -> FilterCondition {
        let mut query = translate(qs);
        assert_eq!(query.filter.conditions.len(), 1, "{qs}");
        query.filter.conditions.remove(0)
    }

    #[test]
    fn test_defaults_without_params() {
        let query = translate("");
        assert!(query.filter.is_empty());
        assert_eq!(query.limit, DEFAULT_LIMIT);
        assert_eq!(query.skip, 0);
        assert_eq!(query.projection, Projection::All);
        assert_eq!(query.number_of_pages(25), 3);
    }

    #[test]
    fn test_paging_and_sort() {
        let query = translate("limit=2&skip=4&sort=-createdAt,title");
        assert_eq!(query.limit, 2);
        assert_eq!(query.skip, 4);
        assert_eq!(
            query.sort,
            vec![SortKey::desc("createdAt"), SortKey::asc("title")]
        );
        assert_eq!(query.number_of_pages(5), 3);
    }

    #[test]
    fn test_limit_is_capped_and_validated() {
        assert_eq!(translate("limit=5000").limit, MAX_LIMIT);
        let translator = QueryTranslator::default();
        assert!(matches!(
            translator.translate_str("limit=0"),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            translator.translate_str("skip=-1"),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            only_condition("category=rust"),
            FilterCondition::eq("category", FilterValue::Text("rust".into()))
        );
        assert_eq!(
            only_condition("readTime.value%3E=5").predicate,
            Predicate::GreaterThanOrEqual(FilterValue::Number(5.0))
        );
        assert_eq!(
            only_condition("readTime.value%3E5").predicate,
            Predicate::GreaterThan(FilterValue::Number(5.0))
        );
        assert_eq!(
            only_condition("readTime.value%3C3").predicate,
            Predicate::LessThan(FilterValue::Number(3.0))
        );
        assert_eq!(
            only_condition("category!=rust").predicate,
            Predicate::NotEqual(FilterValue::Text("rust".into()))
        );
        assert_eq!(
            only_condition("category=rust,go").predicate,
            Predicate::In(vec![
                FilterValue::Text("rust".into()),
                FilterValue::Text("go".into())
            ])
        );
        assert_eq!(only_condition("cover").predicate, Predicate::Exists(true));
        assert_eq!(only_condition("!cover").predicate, Predicate::Exists(false));
        assert_eq!(
            only_condition("title=/own/i").predicate,
            Predicate::Regex {
                pattern: "own".into(),
                case_insensitive: true
            }
        );
    }

    #[test]
    fn test_invalid_regex_is_a_validation_error() {
        assert!(matches!(
            QueryTranslator::default().translate_str("title=/(/"),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_fields_projection() {
        assert_eq!(
            translate("fields=title,category").projection,
            Projection::Include(vec!["title".into(), "category".into()])
        );
        assert_eq!(
            translate("fields=-content").projection,
            Projection::Exclude(vec!["content".into()])
        );
        assert!(
            QueryTranslator::default()
                .translate_str("fields=title,-content")
                .is_err()
        );
    }

    #[test]
    fn test_huge_skip_is_clamped_and_gives_no_next_link() {
        let query = translate("skip=18446744073709551615");
        assert_eq!(query.skip, MAX_SKIP);
        let links = query.links("http://h/blogPosts", 5);
        assert!(links.next.is_none());
        assert!(links.last.is_none());
    }

    #[test]
    fn test_links_keep_filters_and_replace_skip() {
        let query = translate("category=rust&skip=2&limit=2");
        let links = query.links("http://h/blogPosts", 5);
        assert_eq!(
            links.prev.as_deref(),
            Some("http://h/blogPosts?category=rust&limit=2&skip=0")
        );
        assert_eq!(
            links.next.as_deref(),
            Some("http://h/blogPosts?category=rust&limit=2&skip=4")
        );
    }
}
