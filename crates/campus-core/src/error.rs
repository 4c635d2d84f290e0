//! Error types for the CAMPUS system.
//!
//! Every variant maps to exactly one HTTP status at the API boundary:
//! `BadRequest` 400, `Unauthorized` 401, `Forbidden` 403, `NotFound` 404,
//! `Conflict` 409, `Validation` 422, everything else 500. Internal detail
//! (`Database`, `Crypto`, `Internal`) is logged, never exposed to callers.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CampusError {
    #[error("{message}")]
    BadRequest { message: String },

    #[error("{reason}")]
    Unauthorized { reason: String },

    #[error("{reason}")]
    Forbidden { reason: String },

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    Conflict { entity: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CampusError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            reason: reason.into(),
        }
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden {
            reason: reason.into(),
        }
    }
}

pub type CampusResult<T> = Result<T, CampusError>;
