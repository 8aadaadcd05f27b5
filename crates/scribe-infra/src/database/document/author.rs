//! `authors` collection documents.

use bson::DateTime;
use serde::{Deserialize, Serialize};

use scribe_core::domain::Author;
use scribe_core::error::RepoError;

use super::{StoredDocument, parse_uuid};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl StoredDocument for AuthorDocument {
    const COLLECTION: &'static str = "authors";

    fn id(&self) -> &str {
        &self.id
    }
}

impl TryFrom<AuthorDocument> for Author {
    type Error = RepoError;

    fn try_from(doc: AuthorDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&doc.id)?,
            name: doc.name,
            avatar: doc.avatar,
            created_at: doc.created_at.to_chrono(),
            updated_at: doc.updated_at.to_chrono(),
        })
    }
}

impl From<Author> for AuthorDocument {
    fn from(author: Author) -> Self {
        Self {
            id: author.id.to_string(),
            name: author.name,
            avatar: author.avatar,
            created_at: DateTime::from_chrono(author.created_at),
            updated_at: DateTime::from_chrono(author.updated_at),
        }
    }
}
