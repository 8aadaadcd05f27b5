//! # Scribe Infrastructure
//!
//! Concrete implementations of the ports defined in `scribe-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory store only
//! - `mongo` - MongoDB document store

pub mod database;

pub use database::{DatabaseConfig, DocumentStore, Repositories};
