//! MongoDB repository implementations.

use async_trait::async_trait;
use bson::{DateTime as BsonDateTime, Document, doc};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::options::ReturnDocument;
use uuid::Uuid;

use scribe_core::domain::{BlogPost, BlogPostChanges, Comment, User};
use scribe_core::error::RepoError;
use scribe_core::ports::{AuthorRepository, BlogPostRepository, UserRepository};

use super::document::author::AuthorDocument;
use super::document::blog_post::{BlogPostDocument, CommentDocument};
use super::document::user::UserDocument;
use super::mongo_base::{MongoBaseRepository, id_filter, query_error};

/// MongoDB blog post repository.
pub type MongoBlogPostRepository = MongoBaseRepository<BlogPostDocument>;

/// MongoDB author repository.
pub type MongoAuthorRepository = MongoBaseRepository<AuthorDocument>;

/// MongoDB user repository.
pub type MongoUserRepository = MongoBaseRepository<UserDocument>;

fn serialize<T: serde::Serialize>(value: &T) -> Result<bson::Bson, RepoError> {
    bson::to_bson(value).map_err(|e| RepoError::Serialization(e.to_string()))
}

/// `$set` document for the changed fields plus `updatedAt`.
fn set_document(changes: &BlogPostChanges) -> Result<Document, RepoError> {
    let mut set = Document::new();
    if let Some(category) = &changes.category {
        set.insert("category", category.as_str());
    }
    if let Some(title) = &changes.title {
        set.insert("title", title.as_str());
    }
    if let Some(cover) = &changes.cover {
        set.insert("cover", cover.as_str());
    }
    if let Some(read_time) = &changes.read_time {
        set.insert("readTime", serialize(read_time)?);
    }
    if let Some(author) = &changes.author {
        set.insert("author", serialize(author)?);
    }
    if let Some(likes) = &changes.likes {
        let likes: Vec<String> = likes.iter().map(ToString::to_string).collect();
        set.insert("likes", likes);
    }
    if let Some(content) = &changes.content {
        set.insert("content", content.as_str());
    }
    set.insert("updatedAt", BsonDateTime::from_chrono(changes.updated_at));
    Ok(set)
}

impl MongoBlogPostRepository {
    /// Apply `update` to the post and return the post as stored afterwards.
    async fn update_one(&self, id: Uuid, update: Document) -> Result<Option<BlogPost>, RepoError> {
        self.collection
            .find_one_and_update(id_filter(id), update)
            .return_document(ReturnDocument::After)
            .await
            .map_err(query_error)?
            .map(BlogPost::try_from)
            .transpose()
    }
}

#[async_trait]
impl BlogPostRepository for MongoBlogPostRepository {
    async fn update_fields(
        &self,
        id: Uuid,
        changes: &BlogPostChanges,
    ) -> Result<Option<BlogPost>, RepoError> {
        self.update_one(id, doc! { "$set": set_document(changes)? }).await
    }

    async fn push_comment(&self, id: Uuid, comment: Comment) -> Result<Option<BlogPost>, RepoError> {
        let updated_at = BsonDateTime::from_chrono(comment.created_at);
        let comment = serialize(&CommentDocument::from(comment))?;
        self.update_one(
            id,
            doc! {
                "$push": { "comments": comment },
                "$set": { "updatedAt": updated_at }
            },
        )
        .await
    }

    async fn pull_comment(
        &self,
        id: Uuid,
        comment_id: Uuid,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<BlogPost>, RepoError> {
        self.update_one(
            id,
            doc! {
                "$pull": { "comments": { "_id": comment_id.to_string() } },
                "$set": { "updatedAt": BsonDateTime::from_chrono(updated_at) }
            },
        )
        .await
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        tracing::debug!(count = ids.len(), "Resolving users by id");

        let ids: Vec<String> = ids.iter().map(ToString::to_string).collect();
        let documents: Vec<UserDocument> = self
            .collection
            .find(doc! { "_id": { "$in": ids } })
            .await
            .map_err(query_error)?
            .try_collect()
            .await
            .map_err(query_error)?;

        documents.into_iter().map(User::try_from).collect()
    }
}

#[async_trait]
impl AuthorRepository for MongoAuthorRepository {}
