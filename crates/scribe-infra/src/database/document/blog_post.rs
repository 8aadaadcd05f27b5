//! `blogPosts` collection documents.

use bson::DateTime;
use serde::{Deserialize, Serialize};

use scribe_core::domain::{BlogPost, Comment, EmbeddedAuthor, ReadTime};
use scribe_core::error::RepoError;

use super::{StoredDocument, parse_uuid};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub category: String,
    pub title: String,
    pub cover: String,
    pub read_time: ReadTime,
    pub author: EmbeddedAuthor,
    #[serde(default)]
    pub likes: Vec<String>,
    pub content: String,
    #[serde(default)]
    pub comments: Vec<CommentDocument>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl StoredDocument for BlogPostDocument {
    const COLLECTION: &'static str = "blogPosts";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Conversion from a stored comment to the domain Comment.
impl TryFrom<CommentDocument> for Comment {
    type Error = RepoError;

    fn try_from(doc: CommentDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&doc.id)?,
            username: doc.username,
            text: doc.text,
            rating: doc.rating,
            created_at: doc.created_at.to_chrono(),
            updated_at: doc.updated_at.to_chrono(),
        })
    }
}

impl From<Comment> for CommentDocument {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id.to_string(),
            username: comment.username,
            text: comment.text,
            rating: comment.rating,
            created_at: DateTime::from_chrono(comment.created_at),
            updated_at: DateTime::from_chrono(comment.updated_at),
        }
    }
}

/// Conversion from a stored document to the domain BlogPost.
impl TryFrom<BlogPostDocument> for BlogPost {
    type Error = RepoError;

    fn try_from(doc: BlogPostDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&doc.id)?,
            category: doc.category,
            title: doc.title,
            cover: doc.cover,
            read_time: doc.read_time,
            author: doc.author,
            likes: doc
                .likes
                .iter()
                .map(|id| parse_uuid(id))
                .collect::<Result<_, _>>()?,
            content: doc.content,
            comments: doc
                .comments
                .into_iter()
                .map(Comment::try_from)
                .collect::<Result<_, _>>()?,
            created_at: doc.created_at.to_chrono(),
            updated_at: doc.updated_at.to_chrono(),
        })
    }
}

/// Conversion from the domain BlogPost to its stored document.
impl From<BlogPost> for BlogPostDocument {
    fn from(post: BlogPost) -> Self {
        Self {
            id: post.id.to_string(),
            category: post.category,
            title: post.title,
            cover: post.cover,
            read_time: post.read_time,
            author: post.author,
            likes: post.likes.iter().map(ToString::to_string).collect(),
            content: post.content,
            comments: post.comments.into_iter().map(Into::into).collect(),
            created_at: DateTime::from_chrono(post.created_at),
            updated_at: DateTime::from_chrono(post.updated_at),
        }
    }
}
