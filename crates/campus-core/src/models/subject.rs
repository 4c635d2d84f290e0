//! Subject (course) domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::tenant::TenantId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub name: String,
    pub career_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubject {
    pub tenant_id: TenantId,
    pub name: String,
    pub career_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateSubject {
    pub name: Option<String>,
    pub career_id: Option<Option<Uuid>>,
    pub teacher_id: Option<Option<Uuid>>,
}
