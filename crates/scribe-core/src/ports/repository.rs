use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Author, BlogPost, BlogPostChanges, Comment, User};
use crate::error::RepoError;
use crate::query::{Filter, ListQuery};

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Find one page of entities matching the query's filter, in its sort order.
    async fn find_many(&self, query: &ListQuery) -> Result<Vec<T>, RepoError>;

    /// Count entities matching the filter, ignoring pagination.
    async fn count(&self, filter: &Filter) -> Result<u64, RepoError>;

    /// Insert a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Replace a stored entity wholesale. Fails with `NotFound` if it is gone.
    async fn replace(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Fetch every user whose id is in `ids`. Unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError>;
}

/// Author repository.
#[async_trait]
pub trait AuthorRepository: BaseRepository<Author, Uuid> {}

/// Blog post repository. The comment operations are single atomic updates of
/// the parent document; each returns `None` when the post does not exist.
#[async_trait]
pub trait BlogPostRepository: BaseRepository<BlogPost, Uuid> {
    /// Set the changed top-level fields and `updatedAt`.
    async fn update_fields(
        &self,
        id: Uuid,
        changes: &BlogPostChanges,
    ) -> Result<Option<BlogPost>, RepoError>;

    /// Append a comment and set `updatedAt` to the comment's creation time.
    async fn push_comment(&self, id: Uuid, comment: Comment) -> Result<Option<BlogPost>, RepoError>;

    /// Remove the comment with `comment_id` if present and set `updatedAt`.
    async fn pull_comment(
        &self,
        id: Uuid,
        comment_id: Uuid,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<BlogPost>, RepoError>;
}
