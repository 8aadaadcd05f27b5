//! Application state - shared across all handlers.

use std::sync::Arc;

#[cfg(feature = "mongo")]
use anyhow::Context;

use scribe_core::query::QueryTranslator;
use scribe_core::service::{
    AuthorService, BlogPostService, CommentService, ResourceSettings, SummaryFields, UserService,
};
use scribe_infra::DocumentStore;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blog_posts: Arc<BlogPostService>,
    pub comments: Arc<CommentService>,
    pub authors: Arc<AuthorService>,
    pub users: Arc<UserService>,
    /// Origin prepended to request paths when building pagination links.
    pub public_url: String,
    store: Arc<DocumentStore>,
}

impl AppState {
    /// Connect the configured store and build the services over it.
    ///
    /// A configured store that cannot be reached is a startup error; without
    /// `MONGO_URL` the in-memory store is used.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let store = match &config.database {
            #[cfg(feature = "mongo")]
            Some(db) => DocumentStore::connect(db)
                .await
                .with_context(|| format!("failed to connect to document store `{}`", db.database))?,
            #[cfg(not(feature = "mongo"))]
            Some(_) => {
                tracing::warn!("MONGO_URL set but the mongo feature is disabled. Using in-memory store.");
                DocumentStore::in_memory()
            }
            None => {
                tracing::warn!("MONGO_URL not set. Running with the in-memory store.");
                DocumentStore::in_memory()
            }
        };

        let state = Self::with_store(store, config);
        tracing::info!(backend = state.store.backend(), "Application state initialized");
        Ok(state)
    }

    /// Build the services over an already opened store.
    pub fn with_store(store: DocumentStore, config: &AppConfig) -> Self {
        let repos = store.repositories();
        let translator = QueryTranslator::new(config.default_page_limit, config.max_page_limit);
        let settings = ResourceSettings {
            summary_fields: SummaryFields::new(config.summary_fields.iter().cloned()),
            translator,
        };

        Self {
            blog_posts: Arc::new(BlogPostService::new(
                repos.blog_posts.clone(),
                repos.users.clone(),
                settings,
            )),
            comments: Arc::new(CommentService::new(repos.blog_posts)),
            authors: Arc::new(AuthorService::new(repos.authors, translator)),
            users: Arc::new(UserService::new(repos.users, translator)),
            public_url: config.public_url.clone(),
            store: Arc::new(store),
        }
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Release the store connection once the server has stopped.
    pub async fn shutdown(&self) {
        self.store.shutdown().await;
    }
}
