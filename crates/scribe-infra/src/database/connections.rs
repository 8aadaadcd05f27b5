use std::sync::Arc;
#[cfg(feature = "mongo")]
use std::time::Duration;

#[cfg(feature = "mongo")]
use bson::doc;
#[cfg(feature = "mongo")]
use mongodb::{Client, Database, IndexModel, options::ClientOptions};

use scribe_core::ports::{AuthorRepository, BlogPostRepository, UserRepository};

use super::memory::{InMemoryAuthorRepository, InMemoryBlogPostRepository, InMemoryUserRepository};
#[cfg(feature = "mongo")]
use super::document::{StoredDocument, blog_post::BlogPostDocument};
#[cfg(feature = "mongo")]
use super::mongo_repo::{MongoAuthorRepository, MongoBlogPostRepository, MongoUserRepository};

/// Configuration for the document database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub database: String,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
}

/// The three repositories, backed by whichever store is in use.
#[derive(Clone)]
pub struct Repositories {
    pub blog_posts: Arc<dyn BlogPostRepository>,
    pub authors: Arc<dyn AuthorRepository>,
    pub users: Arc<dyn UserRepository>,
}

/// Owns the store connection for the lifetime of the process.
///
/// Connect before the HTTP server accepts requests and call
/// [`DocumentStore::shutdown`] once it has stopped.
///
/// # Example
/// ```ignore
/// let store = DocumentStore::connect(&config).await?;
/// let repos = store.repositories();
/// // ... serve requests ...
/// store.shutdown().await;
/// ```
pub enum DocumentStore {
    #[cfg(feature = "mongo")]
    Mongo { client: Client, db: Database },
    /// Process-local store; nothing to release.
    InMemory(Repositories),
}

impl DocumentStore {
    /// A fresh, empty in-memory store.
    pub fn in_memory() -> Self {
        Self::InMemory(Repositories {
            blog_posts: Arc::new(InMemoryBlogPostRepository::new()),
            authors: Arc::new(InMemoryAuthorRepository::new()),
            users: Arc::new(InMemoryUserRepository::new()),
        })
    }

    /// Connect to MongoDB, verify the connection, and ensure indexes exist.
    #[cfg(feature = "mongo")]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, mongodb::error::Error> {
        tracing::info!("Initializing document store connection...");

        let mut options = ClientOptions::parse(&config.url).await?;
        options.max_pool_size = Some(config.max_pool_size);
        options.min_pool_size = Some(config.min_pool_size);
        options.connect_timeout = Some(Duration::from_secs(10));
        options.max_idle_time = Some(Duration::from_secs(300));
        options.app_name = Some("scribe".to_string());

        let client = Client::with_options(options)?;
        let db = client.database(&config.database);
        db.run_command(doc! { "ping": 1 }).await?;

        let posts = db.collection::<BlogPostDocument>(BlogPostDocument::COLLECTION);
        for keys in [doc! { "category": 1 }, doc! { "createdAt": -1 }] {
            posts
                .create_index(IndexModel::builder().keys(keys).build())
                .await?;
        }

        tracing::info!(
            database = %config.database,
            "Document store connected (pool: {})",
            config.max_pool_size
        );

        Ok(Self::Mongo { client, db })
    }

    pub fn repositories(&self) -> Repositories {
        match self {
            #[cfg(feature = "mongo")]
            Self::Mongo { db, .. } => Repositories {
                blog_posts: Arc::new(MongoBlogPostRepository::new(db)),
                authors: Arc::new(MongoAuthorRepository::new(db)),
                users: Arc::new(MongoUserRepository::new(db)),
            },
            Self::InMemory(repos) => repos.clone(),
        }
    }

    pub fn backend(&self) -> &'static str {
        match self {
            #[cfg(feature = "mongo")]
            Self::Mongo { .. } => "mongodb",
            Self::InMemory(_) => "in-memory",
        }
    }

    /// Release the store connection.
    pub async fn shutdown(&self) {
        match self {
            #[cfg(feature = "mongo")]
            Self::Mongo { client, .. } => {
                // Repositories may still hold collection handles; don't wait for them.
                client.clone().shutdown().immediate(true).await;
                tracing::info!("Document store connection closed");
            }
            Self::InMemory(_) => tracing::debug!("In-memory store dropped"),
        }
    }
}
