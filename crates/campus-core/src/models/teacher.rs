//! Teacher (staff profile) domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::tenant::TenantId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teacher {
    pub id: Uuid,
    pub tenant_id: TenantId,
    /// Login account of the teacher, if one exists.
    pub account_id: Option<Uuid>,
    pub name: String,
    pub email: Option<String>,
    pub specialty: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeacher {
    pub tenant_id: TenantId,
    pub account_id: Option<Uuid>,
    pub name: String,
    pub email: Option<String>,
    pub specialty: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateTeacher {
    pub account_id: Option<Option<Uuid>>,
    pub name: Option<String>,
    pub email: Option<Option<String>>,
    pub specialty: Option<Option<String>>,
}
