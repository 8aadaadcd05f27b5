//! Domain entities - the core business objects.

mod author;
mod blog_post;
mod comment;
mod user;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainError;

pub use author::{Author, AuthorDraft};
pub use blog_post::{
    AuthorDraftFields, BlogPost, BlogPostChanges, BlogPostDraft, BlogPostPatch, EmbeddedAuthor,
    ReadTime, ReadTimeDraft,
};
pub use comment::{Comment, CommentDraft};
pub use user::{User, UserDraft};

/// A top-level record stored in its own collection.
pub trait Record: Clone + Send + Sync + 'static {
    /// Name used in error messages, e.g. `BlogPost with id ... not found!`.
    const KIND: &'static str;

    fn id(&self) -> Uuid;
}

/// Incoming payload for a [`Record`], used both to create one and to patch an
/// existing one.
pub trait RecordDraft: Send {
    type Record: Record;

    fn build(self, now: DateTime<Utc>) -> Result<Self::Record, DomainError>;

    fn merge(self, record: &mut Self::Record, now: DateTime<Utc>) -> Result<(), DomainError>;
}

/// Push a "`field` is required" problem when a text field is absent or blank.
pub(crate) fn require_text(field: &str, value: Option<&String>, problems: &mut Vec<String>) {
    match value {
        Some(v) if !v.trim().is_empty() => {}
        _ => problems.push(format!("{field} is required")),
    }
}

/// Like [`require_text`] but only checks fields that are present (partial updates).
pub(crate) fn reject_blank(field: &str, value: Option<&String>, problems: &mut Vec<String>) {
    if let Some(v) = value {
        if v.trim().is_empty() {
            problems.push(format!("{field} must not be empty"));
        }
    }
}
