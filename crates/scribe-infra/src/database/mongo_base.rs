use async_trait::async_trait;
use bson::{Document, doc};
use futures::TryStreamExt;
use mongodb::{Collection, Database};
use uuid::Uuid;

use scribe_core::error::RepoError;
use scribe_core::ports::BaseRepository;
use scribe_core::query::{Filter, ListQuery};

use super::document::StoredDocument;
use super::mongo_query::{filter_document, sort_document};

/// Generic MongoDB repository implementation over one collection.
pub struct MongoBaseRepository<D>
where
    D: StoredDocument,
{
    pub(crate) collection: Collection<D>,
}

impl<D> MongoBaseRepository<D>
where
    D: StoredDocument,
{
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<D>(D::COLLECTION),
        }
    }
}

pub(crate) fn id_filter(id: Uuid) -> Document {
    doc! { "_id": id.to_string() }
}

pub(crate) fn query_error(e: mongodb::error::Error) -> RepoError {
    RepoError::Query(e.to_string())
}

#[async_trait]
impl<D, T> BaseRepository<T, Uuid> for MongoBaseRepository<D>
where
    D: StoredDocument + From<T>,
    T: TryFrom<D, Error = RepoError> + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, RepoError> {
        let result = self
            .collection
            .find_one(id_filter(id))
            .await
            .map_err(query_error)?;

        result.map(T::try_from).transpose()
    }

    async fn find_many(&self, query: &ListQuery) -> Result<Vec<T>, RepoError> {
        let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);
        let documents: Vec<D> = self
            .collection
            .find(filter_document(&query.filter))
            .sort(sort_document(&query.sort))
            .skip(query.skip)
            .limit(limit)
            .await
            .map_err(query_error)?
            .try_collect()
            .await
            .map_err(query_error)?;

        documents.into_iter().map(T::try_from).collect()
    }

    async fn count(&self, filter: &Filter) -> Result<u64, RepoError> {
        self.collection
            .count_documents(filter_document(filter))
            .await
            .map_err(query_error)
    }

    async fn insert(&self, entity: T) -> Result<T, RepoError> {
        let document = D::from(entity);
        self.collection
            .insert_one(&document)
            .await
            .map_err(query_error)?;
        T::try_from(document)
    }

    async fn replace(&self, entity: T) -> Result<T, RepoError> {
        let document = D::from(entity);
        let result = self
            .collection
            .replace_one(doc! { "_id": document.id() }, &document)
            .await
            .map_err(query_error)?;

        if result.matched_count == 0 {
            return Err(RepoError::NotFound);
        }
        T::try_from(document)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = self
            .collection
            .delete_one(id_filter(id))
            .await
            .map_err(query_error)?;

        if result.deleted_count == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
