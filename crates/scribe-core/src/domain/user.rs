use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Record, RecordDraft, reject_blank, require_text};
use crate::error::DomainError;

/// User entity - someone who can like posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub user_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for User {
    const KIND: &'static str = "User";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Incoming user payload, for creation and partial updates.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    pub user_name: Option<String>,
}

impl UserDraft {
    /// Create a new user with generated ID and timestamps.
    pub fn into_user(self, now: DateTime<Utc>) -> Result<User, DomainError> {
        let mut problems = Vec::new();
        require_text("userName", self.user_name.as_ref(), &mut problems);
        DomainError::invalid_fields(problems)?;

        Ok(User {
            id: Uuid::new_v4(),
            user_name: self.user_name.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn merge_into(self, user: &mut User, now: DateTime<Utc>) -> Result<(), DomainError> {
        let mut problems = Vec::new();
        reject_blank("userName", self.user_name.as_ref(), &mut problems);
        DomainError::invalid_fields(problems)?;

        if let Some(user_name) = self.user_name {
            user.user_name = user_name;
        }
        user.updated_at = now;
        Ok(())
    }
}

impl RecordDraft for UserDraft {
    type Record = User;

    fn build(self, now: DateTime<Utc>) -> Result<User, DomainError> {
        self.into_user(now)
    }

    fn merge(self, record: &mut User, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.merge_into(record, now)
    }
}
