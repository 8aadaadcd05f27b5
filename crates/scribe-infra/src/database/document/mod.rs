//! BSON document models for the MongoDB collections, with conversions to and
//! from the domain records.

pub mod author;
pub mod blog_post;
pub mod user;

use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use scribe_core::error::RepoError;

/// A document type stored in its own collection.
pub trait StoredDocument: Serialize + DeserializeOwned + Unpin + Send + Sync + 'static {
    const COLLECTION: &'static str;

    /// The `_id` value.
    fn id(&self) -> &str;
}

pub(crate) fn parse_uuid(raw: &str) -> Result<Uuid, RepoError> {
    Uuid::parse_str(raw).map_err(|e| RepoError::Serialization(format!("bad id {raw}: {e}")))
}
