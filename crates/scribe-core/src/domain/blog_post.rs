use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Comment, Record, reject_blank, require_text};
use crate::error::DomainError;

/// Reading time estimate, e.g. `{ "value": 4, "unit": "minutes" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadTime {
    pub value: f64,
    pub unit: String,
}

/// Author details embedded in every post.
///
/// Posts carry their own copy; the `authors` collection is a separate resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedAuthor {
    pub name: String,
    pub avatar: String,
}

/// BlogPost entity - a post with its comments stored inline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: Uuid,
    pub category: String,
    pub title: String,
    pub cover: String,
    pub read_time: ReadTime,
    pub author: EmbeddedAuthor,
    /// Ids of users who liked the post.
    #[serde(default)]
    pub likes: Vec<Uuid>,
    pub content: String,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for BlogPost {
    const KIND: &'static str = "BlogPost";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl BlogPost {
    pub fn comment(&self, comment_id: Uuid) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == comment_id)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadTimeDraft {
    pub value: Option<f64>,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorDraftFields {
    pub name: Option<String>,
    pub avatar: Option<String>,
}

/// Incoming payload for creating a post. Every field is optional here so that
/// missing fields are reported together instead of failing deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostDraft {
    pub category: Option<String>,
    pub title: Option<String>,
    pub cover: Option<String>,
    pub read_time: Option<ReadTimeDraft>,
    pub author: Option<AuthorDraftFields>,
    pub likes: Option<Vec<Uuid>>,
    pub content: Option<String>,
}

fn check_read_time(draft: Option<&ReadTimeDraft>, problems: &mut Vec<String>) -> Option<ReadTime> {
    let Some(draft) = draft else {
        problems.push("readTime is required".to_string());
        return None;
    };
    if draft.value.is_none() {
        problems.push("readTime.value is required".to_string());
    }
    require_text("readTime.unit", draft.unit.as_ref(), problems);
    Some(ReadTime {
        value: draft.value?,
        unit: draft.unit.clone().filter(|u| !u.trim().is_empty())?,
    })
}

fn check_author(draft: Option<&AuthorDraftFields>, problems: &mut Vec<String>) -> Option<EmbeddedAuthor> {
    let Some(draft) = draft else {
        problems.push("author is required".to_string());
        return None;
    };
    require_text("author.name", draft.name.as_ref(), problems);
    require_text("author.avatar", draft.avatar.as_ref(), problems);
    Some(EmbeddedAuthor {
        name: draft.name.clone().filter(|n| !n.trim().is_empty())?,
        avatar: draft.avatar.clone().filter(|a| !a.trim().is_empty())?,
    })
}

impl BlogPostDraft {
    /// Validate the payload and build a new post with server id and timestamps.
    pub fn into_blog_post(self, now: DateTime<Utc>) -> Result<BlogPost, DomainError> {
        let mut problems = Vec::new();
        require_text("category", self.category.as_ref(), &mut problems);
        require_text("title", self.title.as_ref(), &mut problems);
        require_text("cover", self.cover.as_ref(), &mut problems);
        require_text("content", self.content.as_ref(), &mut problems);
        let read_time = check_read_time(self.read_time.as_ref(), &mut problems);
        let author = check_author(self.author.as_ref(), &mut problems);
        DomainError::invalid_fields(problems)?;

        match (self.category, self.title, self.cover, self.content, read_time, author) {
            (Some(category), Some(title), Some(cover), Some(content), Some(read_time), Some(author)) => {
                Ok(BlogPost {
                    id: Uuid::new_v4(),
                    category,
                    title,
                    cover,
                    read_time,
                    author,
                    likes: self.likes.unwrap_or_default(),
                    content,
                    comments: Vec::new(),
                    created_at: now,
                    updated_at: now,
                })
            }
            _ => Err(DomainError::Validation("incomplete blog post".to_string())),
        }
    }
}

/// Partial update of a post. Nested objects are replaced as a whole, so a
/// present `readTime` or `author` must be complete.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostPatch {
    pub category: Option<String>,
    pub title: Option<String>,
    pub cover: Option<String>,
    pub read_time: Option<ReadTimeDraft>,
    pub author: Option<AuthorDraftFields>,
    pub likes: Option<Vec<Uuid>>,
    pub content: Option<String>,
}

/// A validated [`BlogPostPatch`], ready to be written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlogPostChanges {
    pub category: Option<String>,
    pub title: Option<String>,
    pub cover: Option<String>,
    pub read_time: Option<ReadTime>,
    pub author: Option<EmbeddedAuthor>,
    pub likes: Option<Vec<Uuid>>,
    pub content: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl BlogPostPatch {
    pub fn validate(self, now: DateTime<Utc>) -> Result<BlogPostChanges, DomainError> {
        let mut problems = Vec::new();
        reject_blank("category", self.category.as_ref(), &mut problems);
        reject_blank("title", self.title.as_ref(), &mut problems);
        reject_blank("cover", self.cover.as_ref(), &mut problems);
        reject_blank("content", self.content.as_ref(), &mut problems);
        let read_time = self
            .read_time
            .as_ref()
            .and_then(|rt| check_read_time(Some(rt), &mut problems));
        let author = self
            .author
            .as_ref()
            .and_then(|a| check_author(Some(a), &mut problems));
        DomainError::invalid_fields(problems)?;

        Ok(BlogPostChanges {
            category: self.category,
            title: self.title,
            cover: self.cover,
            read_time,
            author,
            likes: self.likes,
            content: self.content,
            updated_at: now,
        })
    }
}

impl BlogPostChanges {
    /// Write the changed fields onto `post` and bump `updated_at`.
    pub fn apply(&self, post: &mut BlogPost) {
        if let Some(category) = &self.category {
            post.category = category.clone();
        }
        if let Some(title) = &self.title {
            post.title = title.clone();
        }
        if let Some(cover) = &self.cover {
            post.cover = cover.clone();
        }
        if let Some(read_time) = &self.read_time {
            post.read_time = read_time.clone();
        }
        if let Some(author) = &self.author {
            post.author = author.clone();
        }
        if let Some(likes) = &self.likes {
            post.likes = likes.clone();
        }
        if let Some(content) = &self.content {
            post.content = content.clone();
        }
        post.updated_at = self.updated_at;
    }
}
