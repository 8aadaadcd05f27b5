//! Data Transfer Objects - small response bodies for the API.

use serde::{Deserialize, Serialize};

/// Body of a `201 Created` response: the new record's id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: String,
}

impl CreatedResponse {
    pub fn new(id: impl ToString) -> Self {
        Self { id: id.to_string() }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
    /// Which document store is serving requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<String>,
}
