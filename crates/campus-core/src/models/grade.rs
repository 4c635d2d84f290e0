//! Grade domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::tenant::TenantId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grade {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub student_id: Uuid,
    pub subject_id: Uuid,
    pub score: f64,
    /// Grading period label, e.g. `2026-1`.
    pub term: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGrade {
    pub tenant_id: TenantId,
    pub student_id: Uuid,
    pub subject_id: Uuid,
    pub score: f64,
    pub term: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateGrade {
    pub score: Option<f64>,
    pub term: Option<String>,
}
