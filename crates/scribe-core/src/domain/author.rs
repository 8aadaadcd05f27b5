use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Record, RecordDraft, reject_blank, require_text};
use crate::error::DomainError;

/// Author entity - a standalone author profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: Uuid,
    pub name: String,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Author {
    const KIND: &'static str = "Author";

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorDraft {
    pub name: Option<String>,
    pub avatar: Option<String>,
}

impl AuthorDraft {
    pub fn into_author(self, now: DateTime<Utc>) -> Result<Author, DomainError> {
        let mut problems = Vec::new();
        require_text("name", self.name.as_ref(), &mut problems);
        require_text("avatar", self.avatar.as_ref(), &mut problems);
        DomainError::invalid_fields(problems)?;

        Ok(Author {
            id: Uuid::new_v4(),
            name: self.name.unwrap_or_default(),
            avatar: self.avatar.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn merge_into(self, author: &mut Author, now: DateTime<Utc>) -> Result<(), DomainError> {
        let mut problems = Vec::new();
        reject_blank("name", self.name.as_ref(), &mut problems);
        reject_blank("avatar", self.avatar.as_ref(), &mut problems);
        DomainError::invalid_fields(problems)?;

        if let Some(name) = self.name {
            author.name = name;
        }
        if let Some(avatar) = self.avatar {
            author.avatar = avatar;
        }
        author.updated_at = now;
        Ok(())
    }
}

impl RecordDraft for AuthorDraft {
    type Record = Author;

    fn build(self, now: DateTime<Utc>) -> Result<Author, DomainError> {
        self.into_author(now)
    }

    fn merge(self, record: &mut Author, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.merge_into(record, now)
    }
}
