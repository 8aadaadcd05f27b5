//! # Scribe Core
//!
//! The domain layer of the Scribe blog API: records, payload validation,
//! query translation, and the blog post / comment services.
//! This crate has no infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod query;
pub mod service;

pub use error::DomainError;
