//! # Scribe Shared
//!
//! Wire types shared by the API server and its clients: the problem-details
//! error body, the list envelope, and small response DTOs.

pub mod dto;
pub mod response;

pub use dto::{CreatedResponse, HealthResponse};
pub use response::{ErrorResponse, ListResponse};
