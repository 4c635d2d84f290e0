//! Database-specific error types and conversions.

use campus_core::error::CampusError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Record already exists: {entity}")]
    Conflict { entity: String },

    #[error("Corrupt stored data: {0}")]
    Corrupt(String),
}

impl From<DbError> for CampusError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => CampusError::NotFound { entity, id },
            DbError::Conflict { entity } => CampusError::Conflict { entity },
            other => CampusError::Database(other.to_string()),
        }
    }
}

/// Classify a failed write: a UNIQUE-index violation or a duplicate
/// record id becomes [`DbError::Conflict`]; anything else stays a
/// database error. Uniqueness races (license keys, tenant ids, account
/// emails) are decided here rather than by application-level locking —
/// first writer wins, the loser sees a conflict.
pub fn conflict_on_unique(entity: &str, err: surrealdb::Error) -> DbError {
    let msg = err.to_string();
    if msg.contains("already contains") || msg.contains("already exists") {
        DbError::Conflict {
            entity: entity.to_string(),
        }
    } else {
        DbError::Surreal(err)
    }
}
