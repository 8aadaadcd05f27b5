//! `users` collection documents.

use bson::DateTime;
use serde::{Deserialize, Serialize};

use scribe_core::domain::User;
use scribe_core::error::RepoError;

use super::{StoredDocument, parse_uuid};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_name: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl StoredDocument for UserDocument {
    const COLLECTION: &'static str = "users";

    fn id(&self) -> &str {
        &self.id
    }
}

impl TryFrom<UserDocument> for User {
    type Error = RepoError;

    fn try_from(doc: UserDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&doc.id)?,
            user_name: doc.user_name,
            created_at: doc.created_at.to_chrono(),
            updated_at: doc.updated_at.to_chrono(),
        })
    }
}

impl From<User> for UserDocument {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            user_name: user.user_name,
            created_at: DateTime::from_chrono(user.created_at),
            updated_at: DateTime::from_chrono(user.updated_at),
        }
    }
}
