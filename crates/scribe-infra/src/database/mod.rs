//! Document store adapters: MongoDB and the in-memory fallback.

mod connections;
pub mod memory;

#[cfg(feature = "mongo")]
pub mod document;
#[cfg(feature = "mongo")]
mod mongo_base;
#[cfg(feature = "mongo")]
mod mongo_query;
#[cfg(feature = "mongo")]
pub mod mongo_repo;

pub use connections::{DatabaseConfig, DocumentStore, Repositories};
pub use memory::{
    InMemoryAuthorRepository, InMemoryBlogPostRepository, InMemoryRepository,
    InMemoryUserRepository,
};

#[cfg(feature = "mongo")]
pub use mongo_base::MongoBaseRepository;
#[cfg(feature = "mongo")]
pub use mongo_repo::{MongoAuthorRepository, MongoBlogPostRepository, MongoUserRepository};

#[cfg(test)]
mod tests;
