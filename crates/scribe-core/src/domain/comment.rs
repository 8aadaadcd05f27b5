use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{reject_blank, require_text};
use crate::error::DomainError;

/// Comment embedded in a blog post. It has no identity outside its parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub username: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Incoming comment payload, used for both inserts and partial updates.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentDraft {
    pub username: Option<String>,
    pub text: Option<String>,
    pub rating: Option<f64>,
}

impl CommentDraft {
    /// Build a new comment; both timestamps are `now`.
    pub fn into_comment(self, now: DateTime<Utc>) -> Result<Comment, DomainError> {
        let mut problems = Vec::new();
        require_text("username", self.username.as_ref(), &mut problems);
        require_text("text", self.text.as_ref(), &mut problems);
        DomainError::invalid_fields(problems)?;

        match (self.username, self.text) {
            (Some(username), Some(text)) => Ok(Comment {
                id: Uuid::new_v4(),
                username,
                text,
                rating: self.rating,
                created_at: now,
                updated_at: now,
            }),
            _ => Err(DomainError::Validation("incomplete comment".to_string())),
        }
    }

    /// Merge the present fields into `comment` and stamp `updated_at`.
    pub fn merge_into(self, comment: &mut Comment, now: DateTime<Utc>) -> Result<(), DomainError> {
        let mut problems = Vec::new();
        reject_blank("username", self.username.as_ref(), &mut problems);
        reject_blank("text", self.text.as_ref(), &mut problems);
        DomainError::invalid_fields(problems)?;

        if let Some(username) = self.username {
            comment.username = username;
        }
        if let Some(text) = self.text {
            comment.text = text;
        }
        if self.rating.is_some() {
            comment.rating = self.rating;
        }
        comment.updated_at = now;
        Ok(())
    }
}
