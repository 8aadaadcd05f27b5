//! In-memory document store - used when no MongoDB URL is configured.
//!
//! Records are kept in insertion order behind an async `RwLock`. Every port
//! call takes the lock once, so each call is atomic with respect to the others.
//! Data is lost on process restart.

mod matcher;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use scribe_core::domain::{Author, BlogPost, BlogPostChanges, Comment, Record, User};
use scribe_core::error::RepoError;
use scribe_core::ports::{AuthorRepository, BaseRepository, BlogPostRepository, UserRepository};
use scribe_core::query::{Filter, ListQuery};

use matcher::{CompiledFilter, compare_by};

/// Generic in-memory repository for any [`Record`].
pub struct InMemoryRepository<T> {
    store: RwLock<Vec<T>>,
}

/// In-memory blog post repository.
pub type InMemoryBlogPostRepository = InMemoryRepository<BlogPost>;

/// In-memory author repository.
pub type InMemoryAuthorRepository = InMemoryRepository<Author>;

/// In-memory user repository.
pub type InMemoryUserRepository = InMemoryRepository<User>;

impl<T> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Vec::new()),
        }
    }
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn to_document<T: Serialize>(record: &T) -> Result<Value, RepoError> {
    serde_json::to_value(record).map_err(|e| RepoError::Serialization(e.to_string()))
}

/// Records matching `filter`, each paired with its serialized form.
fn matching<'a, T: Serialize>(
    records: &'a [T],
    filter: &Filter,
) -> Result<Vec<(Value, &'a T)>, RepoError> {
    let compiled = CompiledFilter::compile(filter)?;
    let mut matched = Vec::new();
    for record in records {
        let doc = to_document(record)?;
        if compiled.matches(&doc) {
            matched.push((doc, record));
        }
    }
    Ok(matched)
}

#[async_trait]
impl<T> BaseRepository<T, Uuid> for InMemoryRepository<T>
where
    T: Record + Serialize,
{
    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, RepoError> {
        let store = self.store.read().await;
        Ok(store.iter().find(|r| r.id() == id).cloned())
    }

    async fn find_many(&self, query: &ListQuery) -> Result<Vec<T>, RepoError> {
        let store = self.store.read().await;
        let mut matched = matching(&store, &query.filter)?;
        if !query.sort.is_empty() {
            // Stable, so ties keep insertion order.
            matched.sort_by(|(a, _), (b, _)| compare_by(&query.sort, a, b));
        }
        Ok(matched
            .into_iter()
            .skip(usize::try_from(query.skip).unwrap_or(usize::MAX))
            .take(usize::try_from(query.limit).unwrap_or(usize::MAX))
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn count(&self, filter: &Filter) -> Result<u64, RepoError> {
        let store = self.store.read().await;
        Ok(matching(&store, filter)?.len() as u64)
    }

    async fn insert(&self, entity: T) -> Result<T, RepoError> {
        let mut store = self.store.write().await;
        if store.iter().any(|r| r.id() == entity.id()) {
            return Err(RepoError::Query(format!(
                "duplicate {} id {}",
                T::KIND,
                entity.id()
            )));
        }
        store.push(entity.clone());
        Ok(entity)
    }

    async fn replace(&self, entity: T) -> Result<T, RepoError> {
        let mut store = self.store.write().await;
        let slot = store
            .iter_mut()
            .find(|r| r.id() == entity.id())
            .ok_or(RepoError::NotFound)?;
        *slot = entity.clone();
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        let index = store
            .iter()
            .position(|r| r.id() == id)
            .ok_or(RepoError::NotFound)?;
        store.remove(index);
        Ok(())
    }
}

impl InMemoryBlogPostRepository {
    /// Run `edit` on the post with `id` under the write lock.
    async fn modify(
        &self,
        id: Uuid,
        edit: impl FnOnce(&mut BlogPost),
    ) -> Result<Option<BlogPost>, RepoError> {
        let mut store = self.store.write().await;
        Ok(store.iter_mut().find(|p| p.id == id).map(|post| {
            edit(post);
            post.clone()
        }))
    }
}

#[async_trait]
impl BlogPostRepository for InMemoryBlogPostRepository {
    async fn update_fields(
        &self,
        id: Uuid,
        changes: &BlogPostChanges,
    ) -> Result<Option<BlogPost>, RepoError> {
        self.modify(id, |post| changes.apply(post)).await
    }

    async fn push_comment(&self, id: Uuid, comment: Comment) -> Result<Option<BlogPost>, RepoError> {
        self.modify(id, |post| {
            post.updated_at = comment.created_at;
            post.comments.push(comment);
        })
        .await
    }

    async fn pull_comment(
        &self,
        id: Uuid,
        comment_id: Uuid,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<BlogPost>, RepoError> {
        self.modify(id, |post| {
            post.comments.retain(|c| c.id != comment_id);
            post.updated_at = updated_at;
        })
        .await
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let store = self.store.read().await;
        Ok(store.iter().filter(|u| ids.contains(&u.id)).cloned().collect())
    }
}

#[async_trait]
impl AuthorRepository for InMemoryAuthorRepository {}
