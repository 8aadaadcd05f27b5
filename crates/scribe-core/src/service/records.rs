use std::marker::PhantomData;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use super::{Page, parse_id, repo_error, to_json};
use crate::domain::{AuthorDraft, Record, RecordDraft, UserDraft};
use crate::error::DomainError;
use crate::ports::{AuthorRepository, BaseRepository, UserRepository};
use crate::query::QueryTranslator;

/// Plain CRUD over one top-level collection.
pub struct RecordService<D, R: ?Sized> {
    repo: Arc<R>,
    translator: QueryTranslator,
    _draft: PhantomData<fn(D)>,
}

/// Authors: standalone author profiles.
pub type AuthorService = RecordService<AuthorDraft, dyn AuthorRepository>;

/// Users: the people referenced by a post's `likes`.
pub type UserService = RecordService<UserDraft, dyn UserRepository>;

impl<D, R> RecordService<D, R>
where
    D: RecordDraft,
    D::Record: Serialize,
    R: BaseRepository<D::Record, Uuid> + ?Sized,
{
    pub fn new(repo: Arc<R>, translator: QueryTranslator) -> Self {
        Self {
            repo,
            translator,
            _draft: PhantomData,
        }
    }

    pub async fn create(&self, draft: D) -> Result<Uuid, DomainError> {
        let record = draft.build(Utc::now())?;
        let saved = self.repo.insert(record).await?;
        tracing::info!(kind = <D::Record as Record>::KIND, id = %saved.id(), "Record created");
        Ok(saved.id())
    }

    /// List records matching `query_string`, projected to JSON.
    pub async fn list(&self, query_string: &str, base_url: &str) -> Result<Page<Value>, DomainError> {
        let query = self.translator.translate_str(query_string)?;
        let records = self.repo.find_many(&query).await?;
        let total = self.repo.count(&query.filter).await?;

        let items = records
            .iter()
            .map(|record| {
                let mut item = to_json(record)?;
                query.projection.apply(&mut item);
                Ok(item)
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        Ok(Page {
            links: query.links(base_url, total),
            total,
            number_of_pages: query.number_of_pages(total),
            items,
        })
    }

    pub async fn get(&self, id: &str) -> Result<D::Record, DomainError> {
        let record_id = parse_id::<D::Record>(id)?;
        self.repo
            .find_by_id(record_id)
            .await?
            .ok_or_else(|| DomainError::not_found(<D::Record as Record>::KIND, id))
    }

    /// Merge the present fields and bump `updatedAt`.
    pub async fn update(&self, id: &str, draft: D) -> Result<D::Record, DomainError> {
        let mut record = self.get(id).await?;
        draft.merge(&mut record, Utc::now())?;
        let saved = self
            .repo
            .replace(record)
            .await
            .map_err(repo_error::<D::Record>(id))?;
        tracing::info!(kind = <D::Record as Record>::KIND, id = %saved.id(), "Record updated");
        Ok(saved)
    }

    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let record_id = parse_id::<D::Record>(id)?;
        self.repo
            .delete(record_id)
            .await
            .map_err(repo_error::<D::Record>(id))?;
        tracing::info!(kind = <D::Record as Record>::KIND, id = %record_id, "Record deleted");
        Ok(())
    }
}
