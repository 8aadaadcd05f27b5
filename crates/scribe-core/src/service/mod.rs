//! Resource services - the operations behind the HTTP handlers.

mod blog_posts;
mod comments;
mod records;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

pub use blog_posts::{BlogPostPage, BlogPostService, BlogPostView};
pub use comments::CommentService;
pub use records::{AuthorService, RecordService, UserService};

use crate::domain::Record;
use crate::error::{DomainError, RepoError};
use crate::query::QueryTranslator;

/// Field names kept when a referenced or embedded record is reduced to a
/// summary (the post's `author` and every resolved like). `id` is always kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryFields(HashSet<String>);

impl Default for SummaryFields {
    fn default() -> Self {
        Self::new(["firstName", "lastName", "userName", "name"])
    }
}

impl SummaryFields {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(fields.into_iter().map(Into::into).collect())
    }

    pub fn reduce(&self, value: Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(
                map.into_iter()
                    .filter(|(k, _)| k == "id" || self.0.contains(k))
                    .collect::<Map<_, _>>(),
            ),
            other => other,
        }
    }
}

/// Construction-time settings for the resource services.
#[derive(Debug, Clone, Default)]
pub struct ResourceSettings {
    pub summary_fields: SummaryFields,
    pub translator: QueryTranslator,
}

/// One page of a listing plus its pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub links: crate::query::PageLinks,
    pub total: u64,
    pub number_of_pages: u64,
    pub items: Vec<T>,
}

/// Parse a path id. Anything that is not a UUID cannot name a stored record,
/// so it is reported as not found.
pub fn parse_id<R: Record>(raw: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw.trim()).map_err(|_| DomainError::not_found(R::KIND, raw))
}

/// Map a store failure for the record `id`, turning `RepoError::NotFound` into
/// the domain's not-found error.
pub fn repo_error<R: Record>(id: impl ToString) -> impl FnOnce(RepoError) -> DomainError {
    move |err| match err {
        RepoError::NotFound => DomainError::not_found(R::KIND, id),
        other => other.into(),
    }
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<Value, DomainError> {
    serde_json::to_value(value).map_err(|e| DomainError::Internal(e.to_string()))
}
